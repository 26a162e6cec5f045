//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tb CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// tb - Filter taskbook tasks from the command line
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Task file to read (default: from config, then the data directory)
    #[arg(long, global = true, env = "TB_TASKS", value_name = "PATH")]
    pub tasks: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks matching a filter expression
    #[command(alias = "f")]
    Find {
        /// Filter expression (e.g., 'n:Hello && p>1'); words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Show at most this many tasks
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print only the number of matching tasks
        #[arg(short, long)]
        count: bool,
    },

    /// Check a filter expression without running it
    Check {
        /// Filter expression; words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write a default config file if none exists
    Init,
}

/// Joins expression words the way a shell user expects: `tb find n:a p>1`.
pub fn join_expression(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_find_joins_words() {
        let cli = Cli::parse_from(["tb", "find", "n:Hello", "p>1"]);
        if let Some(Commands::Find {
            expression,
            limit,
            count,
        }) = cli.command
        {
            assert_eq!(join_expression(&expression), "n:Hello p>1");
            assert_eq!(limit, None);
            assert!(!count);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn test_find_alias_and_options() {
        let cli = Cli::parse_from(["tb", "f", "--limit", "3", "--count", "t:CS2103"]);
        if let Some(Commands::Find {
            expression,
            limit,
            count,
        }) = cli.command
        {
            assert_eq!(expression, vec!["t:CS2103"]);
            assert_eq!(limit, Some(3));
            assert!(count);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn test_find_requires_expression() {
        assert!(Cli::try_parse_from(["tb", "find"]).is_err());
    }

    #[test]
    fn test_check_accepts_negation() {
        let cli = Cli::parse_from(["tb", "check", "!n:Hello"]);
        assert!(matches!(cli.command, Some(Commands::Check { .. })));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tb", "--json", "--no-color", "--tasks", "/tmp/t.json", "check", "x"]);
        assert!(cli.json);
        assert!(cli.no_color);
        assert_eq!(cli.tasks, Some(PathBuf::from("/tmp/t.json")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tb", "-q", "-v", "check", "x"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["tb", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Init)
            })
        ));
        let cli = Cli::parse_from(["tb", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config { command: None })));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["tb", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
