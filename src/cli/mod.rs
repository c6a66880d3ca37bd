//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for stockfeed using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Stockfeed - inventory feed exporter
#[derive(Parser, Debug)]
#[command(name = "stockfeed")]
#[command(version, about, long_about = None)]
#[command(author = "Stockfeed Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "stockfeed.toml", env = "STOCKFEED_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STOCKFEED_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the inventory feed, transfer it and record the run
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show recent runs from the audit log
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["stockfeed", "run"]);
        assert_eq!(cli.config, "stockfeed.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_overrides() {
        let cli = Cli::parse_from([
            "stockfeed",
            "run",
            "--dry-run",
            "--ratio",
            "0.5",
            "--page-size",
            "200",
        ]);

        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert_eq!(args.ratio, Some(0.5));
                assert_eq!(args.page_size, Some(200));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["stockfeed", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["stockfeed", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["stockfeed", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["stockfeed", "status", "--limit", "3"]);
        match cli.command {
            Commands::Status(args) => assert_eq!(args.limit, 3),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["stockfeed", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
