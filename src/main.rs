// Stockfeed - Inventory feed exporter
// Copyright (c) 2025 Stockfeed Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use stockfeed::cli::{Cli, Commands};
use stockfeed::config::{load_config, LoggingConfig};
use stockfeed::core::export::EXIT_FATAL;
use stockfeed::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Stockfeed - Inventory feed exporter"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Logging level and sinks for this invocation
///
/// Only `run` writes log files. A configuration that fails to load falls back
/// to the console; the command itself reports the error.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let loaded = match cli.command {
        Commands::Run(_) => load_config(&cli.config).ok(),
        _ => None,
    };

    let (config_level, logging) = match loaded {
        Some(config) => (config.application.log_level, config.logging),
        None => ("info".to_string(), LoggingConfig::console_only()),
    };

    (cli.log_level.clone().unwrap_or(config_level), logging)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
