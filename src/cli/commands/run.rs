//! Run command implementation
//!
//! This module implements the `run` command: one export of the inventory
//! feed, its transfer to the partner, and the audit row.

use crate::config::{load_config, StockfeedConfig};
use crate::core::export::{PipelineRunner, RunSummary, EXIT_CONFIG_ERROR};
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Write the artifact and audit row but skip the transfer
    #[arg(long)]
    pub dry_run: bool,

    /// Override the quantity ratio
    #[arg(long)]
    pub ratio: Option<f64>,

    /// Override the page size
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut StockfeedConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(ratio) = self.ratio {
            tracing::info!(ratio, "Overriding quantity ratio from CLI");
            config.transform.ratio = ratio;
        }

        if let Some(page_size) = self.page_size {
            tracing::info!(page_size, "Overriding page size from CLI");
            config.source.page_size = page_size;
        }
    }

    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - the artifact is written but not transferred");
            println!();
        }

        let runner = match PipelineRunner::from_config(&config).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize pipeline");
                eprintln!("Failed to initialize run: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let summary = runner.run().await;
        print_summary(&summary);

        Ok(summary.exit_code())
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Run Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Source rows: {}", summary.source_rows);
    println!("  Rejected rows: {}", summary.rejected_rows);

    if let Some(stats) = &summary.stats {
        println!("  Lines written: {}", stats.line_count);
        println!("  Distinct part numbers: {}", stats.distinct_key_count());
        println!("  Total quantity: {}", stats.total_quantity);
        println!("  Artifact size: {} bytes", stats.file_size_bytes);
        if let Some(sha256) = &stats.sha256 {
            println!("  SHA-256: {sha256}");
        }
    }
    if let Some(path) = &summary.artifact_path {
        println!("  Artifact: {}", path.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    match (&summary.error, &summary.transfer) {
        (Some(error), _) => println!("❌ Run failed: {error}"),
        (None, Some(transfer)) if summary.dry_run => {
            println!("✅ Dry run completed: {}", transfer.message)
        }
        (None, Some(transfer)) if transfer.success => {
            println!("✅ Feed delivered: {}", transfer.message)
        }
        (None, Some(transfer)) => {
            println!(
                "⚠️  Artifact written but not delivered: {}",
                transfer.message
            )
        }
        (None, None) => println!("⚠️  Run ended without a transfer result"),
    }

    if !summary.audit_written {
        println!("⚠️  The audit row could not be written; see the log for details");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config() -> StockfeedConfig {
        let toml_content = r#"
[source]
backend = "postgrest"
table = "inventory"
page_size = 1000

[postgrest]
url = "http://localhost:3000"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();
        load_config(file.path()).unwrap()
    }

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs::default();
        let mut cfg = config();
        args.apply_overrides(&mut cfg);

        assert!(!cfg.application.dry_run);
        assert_eq!(cfg.transform.ratio, 0.8);
        assert_eq!(cfg.source.page_size, 1000);
    }

    #[test]
    fn test_run_args_with_overrides() {
        let args = RunArgs {
            dry_run: true,
            ratio: Some(1.0),
            page_size: Some(50),
        };
        let mut cfg = config();
        args.apply_overrides(&mut cfg);

        assert!(cfg.application.dry_run);
        assert_eq!(cfg.transform.ratio, 1.0);
        assert_eq!(cfg.source.page_size, 50);
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let code = RunArgs::default()
            .execute("does-not-exist.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_override_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[source]
backend = "postgrest"
table = "inventory"

[postgrest]
url = "http://localhost:3000"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
        )
        .unwrap();

        let args = RunArgs {
            page_size: Some(0),
            ..RunArgs::default()
        };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
