use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::Dispatch;
use output::{format_error_json, format_filter_diagnostic};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = load_config();
    let config_color = config.as_ref().ok().and_then(|c| c.output.color);
    let ctx = CommandContext::from_cli(&cli, config_color);

    let dispatch = Dispatch::from_cli(&cli);
    if let Some(expression) = dispatch.expression() {
        debug!(expression, "filter expression");
    }

    match dispatch.execute(&ctx, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&ctx, &e);
            error_exit_code(&e)
        }
    }
}

/// Sets up the stderr log subscriber.
///
/// `TB_LOG` takes an `EnvFilter` directive and wins over the flags.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env("TB_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "debug"
        } else if cli.quiet {
            "error"
        } else {
            "warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();
}

fn report_error(ctx: &CommandContext, e: &CommandError) {
    if ctx.json_output {
        let (message, span) = match e {
            CommandError::Filter { source, .. } => (source.to_string(), source.span()),
            _ => (e.to_string(), None),
        };
        eprintln!("{}", format_error_json(error_code(e), message, span));
        return;
    }

    match e {
        CommandError::Filter { expression, source } => {
            eprint!(
                "{}",
                format_filter_diagnostic(expression, source, ctx.use_colors)
            );
        }
        _ => eprintln!("Error: {e}"),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter { source, .. } => source.kind().code(),
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter { .. } => 1,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 4,
        CommandError::Config(_) => 5,
        CommandError::Store(_) => 5,
    }
}
