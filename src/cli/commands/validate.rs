//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the stockfeed configuration file and, optionally, the source table.

use crate::adapters::datastore::create_datastore;
use crate::config::schema::SourceBackend;
use crate::config::{load_config, StockfeedConfig};
use crate::core::export::{EXIT_CONFIG_ERROR, EXIT_OK, EXIT_RUN_FAILED};
use crate::core::reader::SchemaMapping;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also connect to the datastore and resolve the column mapping
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates every section before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        print_summary(&config);

        if !self.check_connection {
            return Ok(EXIT_OK);
        }

        match check_source(&config).await {
            Ok(mapping) => {
                println!("✅ Source table reachable");
                println!(
                    "  Column mapping: id = {}, part_number = {}, quantity = {}",
                    mapping.id, mapping.part_number, mapping.quantity
                );
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Source check failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_RUN_FAILED)
            }
        }
    }
}

fn print_summary(config: &StockfeedConfig) {
    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Source Backend: {}", config.source.backend);
    match config.source.backend {
        SourceBackend::PostgreSQL => {
            if let Some(ref pg_config) = config.postgresql {
                use secrecy::ExposeSecret;
                let connection_string = pg_config.connection_string.expose_secret();
                println!(
                    "  PostgreSQL Connection: {}",
                    connection_string.redacted_endpoint()
                );
                println!("  Max Connections: {}", pg_config.max_connections);
            }
        }
        SourceBackend::PostgREST => {
            if let Some(ref rest_config) = config.postgrest {
                println!("  PostgREST URL: {}", rest_config.url);
                let api_key = if rest_config.api_key.is_some() {
                    "set"
                } else {
                    "not set"
                };
                println!("  API Key: {api_key}");
            }
        }
    }
    println!("  Source Table: {}", config.source.table);
    println!("  Page Size: {}", config.source.page_size);
    println!("  Ratio: {}", config.transform.ratio);
    println!("  Artifact Directory: {}", config.artifact.local_dir);
    println!(
        "  Transfer Target: {}:{}{}",
        config.transfer.host,
        config.transfer.port,
        config.transfer.remote_path()
    );
    println!("  FTPS: {}", config.transfer.secure);
    let credentials = if config.transfer.has_credentials() {
        "set"
    } else {
        "missing"
    };
    println!("  Credentials: {credentials}");
    println!("  Audit Table: {}", config.audit.table);
    println!();
}

async fn check_source(config: &StockfeedConfig) -> crate::domain::Result<SchemaMapping> {
    let datastore = create_datastore(config).await?;
    datastore.source.test_connection().await?;

    let available = datastore
        .source
        .discover_columns(&config.source.table)
        .await?;
    SchemaMapping::resolve(
        &config.source.table,
        &config.source.columns,
        available.as_deref(),
    )
}
