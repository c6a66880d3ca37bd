//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::core::export::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "stockfeed.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing stockfeed configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set source.backend to 'postgresql' or 'postgrest'");
                println!("  3. Create a .env file with your credentials:");
                println!("     - STOCKFEED_PG_URL (PostgreSQL) or STOCKFEED_POSTGREST_KEY");
                println!("     - STOCKFEED_FTP_USER and STOCKFEED_FTP_PASSWORD");
                println!(
                    "  4. Validate configuration: stockfeed validate-config --check-connection"
                );
                println!("  5. Try it out: stockfeed run --dry-run");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Stockfeed Configuration File
# Inventory feed exporter

[source]
backend = "postgresql"  # postgresql | postgrest
table = "public.inventory"
page_size = 1000

[postgresql]
connection_string = "${STOCKFEED_PG_URL}"

[transform]
ratio = 0.8

[artifact]
local_dir = "./out"

[transfer]
host = "ftp.partner.example"
username = "${STOCKFEED_FTP_USER}"
password = "${STOCKFEED_FTP_PASSWORD}"
remote_dir = "/inbound"
remote_name = "inventory.csv"
secure = true

[audit]
table = "export_audit_log"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Stockfeed Configuration File
# Inventory feed exporter
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with STOCKFEED_<SECTION>_<KEY>, for example
# STOCKFEED_TRANSFER_HOST or STOCKFEED_SOURCE_PAGE_SIZE.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"
# Write the artifact and audit row but skip the transfer
dry_run = false

[source]
# Backend serving the inventory table: postgresql | postgrest
backend = "postgresql"
# Table name, optionally schema-qualified
table = "public.inventory"
# Rows per page (1-10000)
page_size = 1000

# Candidate column names per field; the first one present in the table wins
[source.columns]
id = ["id"]
part_number = ["part_number", "partNumber"]
quantity = ["quantity", "qty"]

[postgresql]
connection_string = "${STOCKFEED_PG_URL}"
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 60
# disable | prefer | require
ssl_mode = "prefer"

# Use instead of [postgresql] when source.backend = "postgrest"
# [postgrest]
# url = "https://project.example.co/rest/v1"
# api_key = "${STOCKFEED_POSTGREST_KEY}"
# timeout_seconds = 30

[transform]
# Published quantity = round(quantity * ratio); rows ending up at 0 are dropped
ratio = 0.8

[artifact]
local_dir = "./out"
# Adds a constant vendor column
# vendor = "ACME"
# Adds an exportedAt column with the run's start time
include_timestamp = false

[transfer]
host = "ftp.partner.example"
port = 21
username = "${STOCKFEED_FTP_USER}"
password = "${STOCKFEED_FTP_PASSWORD}"
remote_dir = "/inbound"
# Overwritten by every run
remote_name = "inventory.csv"
# Explicit FTPS (AUTH TLS)
secure = true
# passive | extended_passive
passive_mode = "passive"
timeout_seconds = 30
# Fail the transfer when the remote size differs from the local size
strict_size = false

[audit]
table = "export_audit_log"
# Create the audit table on startup (PostgreSQL only)
ensure_table = true

[logging]
local_enabled = true
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StockfeedConfig;
    use tempfile::TempDir;

    fn parse(content: &str) -> StockfeedConfig {
        let content = content.replace(
            "${STOCKFEED_PG_URL}",
            "postgresql://feed:pw@localhost:5432/stock",
        );
        toml::from_str(&content).unwrap()
    }

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "stockfeed.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "stockfeed.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config = parse(&InitArgs::generate_minimal_config());

        assert!(config.validate().is_ok());
        assert_eq!(config.transfer.remote_name, "inventory.csv");
        assert!(config.transfer.secure);
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = parse(&InitArgs::generate_config_with_examples());

        assert!(config.validate().is_ok());
        assert_eq!(config.source.columns.quantity, vec!["quantity", "qty"]);
        assert!(config.logging.local_enabled);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("stockfeed.toml");
        fs::write(&output, "# keep me").unwrap();

        let args = InitArgs {
            output: output.display().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# keep me");

        let args = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&output).unwrap().contains("[transfer]"));
    }
}
