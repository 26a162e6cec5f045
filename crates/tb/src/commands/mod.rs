//! Command implementations for the tb CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod find;

use std::env;
use std::path::PathBuf;

use taskbook_filter_rs::filter::{Filter, FilterError, FilterParser};
use taskbook_filter_rs::{TaskList, TaskStore};
use tracing::debug;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter expression error, with the expression it was raised for.
    #[error("filter error: {source}")]
    Filter {
        /// The expression as the user wrote it.
        expression: String,
        /// The underlying compiler error.
        #[source]
        source: FilterError,
    },

    /// Task store error.
    #[error("task store error: {0}")]
    Store(#[from] taskbook_filter_rs::TaskStoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
#[derive(Debug)]
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Task file given on the command line or through `TB_TASKS`.
    pub tasks_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are on unless `--no-color` is given, `NO_COLOR` is set, or the
    /// config turns them off.
    pub fn from_cli(cli: &Cli, config_color: Option<bool>) -> Self {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config_color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
            tasks_path: cli.tasks.clone(),
        }
    }
}

/// Compiles an expression, keeping the source text for diagnostics.
pub fn compile(expression: &str) -> Result<Filter> {
    FilterParser::parse(expression).map_err(|source| CommandError::Filter {
        expression: expression.to_string(),
        source,
    })
}

/// Opens the task store the user asked for.
///
/// Precedence: `--tasks` / `TB_TASKS`, then `tasks` in the config file, then the
/// default data directory. An explicitly chosen file must exist; a missing
/// default file reads as an empty list.
pub fn load_tasks(ctx: &CommandContext, config: &config::Config) -> Result<TaskList> {
    let explicit = ctx.tasks_path.clone().or_else(|| config.tasks.clone());
    match explicit {
        Some(path) => {
            debug!(path = %path.display(), "reading task file");
            Ok(TaskStore::with_path(path).load()?)
        }
        None => {
            let store = TaskStore::new()?;
            debug!(path = %store.path().display(), "reading default task file");
            Ok(store.load_or_default()?)
        }
    }
}
