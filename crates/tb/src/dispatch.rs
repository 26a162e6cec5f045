//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{join_expression, Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::Config;
use crate::commands::find::FindOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// A parsed command ready to run.
pub enum Dispatch<'a> {
    Find(FindOptions),
    Check(String),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Builds the dispatch for the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Find {
                expression,
                limit,
                count,
            }) => Self::Find(FindOptions {
                expression: join_expression(expression),
                limit: *limit,
                count: *count,
            }),
            Some(Commands::Check { expression }) => Self::Check(join_expression(expression)),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }

    /// Returns the filter expression this command compiles, if any.
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Find(opts) => Some(&opts.expression),
            Self::Check(expression) => Some(expression),
            _ => None,
        }
    }

    /// Executes the command.
    ///
    /// `config` is the result of loading the config file; only commands that
    /// read it fail when it could not be loaded.
    pub fn execute(self, ctx: &CommandContext, config: Result<Config>) -> Result<()> {
        match self {
            Self::Find(opts) => commands::find::execute(ctx, &opts, &config?),
            Self::Check(expression) => commands::check::execute(ctx, &expression),
            Self::Config(command) => dispatch_config(ctx, command, config),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("tb - filter taskbook tasks");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(
    ctx: &CommandContext,
    command: &Option<ConfigCommands>,
    config: Result<Config>,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx, &config?),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init) => commands::config::execute_init(ctx),
    }
}
