//! Status command implementation
//!
//! This module implements the `status` command for displaying recent runs
//! from the audit log.

use crate::adapters::datastore::create_datastore;
use crate::config::load_config;
use crate::core::export::{EXIT_CONFIG_ERROR, EXIT_OK, EXIT_RUN_FAILED};
use crate::domain::AuditRow;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of recent runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(limit = self.limit, "Checking run history");

        println!("📊 Run History");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let datastore = match create_datastore(&config).await {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to create datastore client");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let rows = match datastore.audit.recent(self.limit).await {
            Ok(rows) => rows,
            Err(e) => {
                println!("❌ Failed to read audit log '{}'", config.audit.table);
                println!("   Error: {e}");
                return Ok(EXIT_RUN_FAILED);
            }
        };

        if rows.is_empty() {
            println!("No runs recorded yet.");
            println!("Run 'stockfeed run' to export the feed.");
            return Ok(EXIT_OK);
        }

        println!("Last {} run(s):", rows.len());
        println!();
        println!(
            "{:<20} {:<10} {:<8} {:>8} {:>12} {:<10} Message",
            "Timestamp", "Run", "Mode", "Lines", "Quantity", "Status"
        );
        println!("{}", "-".repeat(100));

        for row in &rows {
            println!("{}", format_row(row));
        }

        println!();
        Ok(EXIT_OK)
    }
}

fn format_row(row: &AuditRow) -> String {
    let status = if row.success { "✅ ok" } else { "❌ failed" };
    let mode = if row.dry_run { "dry-run" } else { "live" };
    let run: String = row.run_id.chars().take(8).collect();
    let count = |value: Option<i64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    format!(
        "{:<20} {:<10} {:<8} {:>8} {:>12} {:<10} {}",
        row.timestamp.format("%Y-%m-%d %H:%M:%S"),
        run,
        mode,
        count(row.line_count),
        count(row.total_quantity),
        status,
        row.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditRowBuilder, RunStats, TransferResult};

    #[test]
    fn test_format_failure_row() {
        let row = AuditRowBuilder::new("0123456789abcdef", false)
            .failure("Source error: Query failed")
            .build();

        let line = format_row(&row);
        assert!(line.contains("01234567 "));
        assert!(!line.contains("89abcdef"));
        assert!(line.contains("live"));
        assert!(line.contains("failed"));
        assert!(line.contains(" - "));
    }

    #[test]
    fn test_format_dry_run_row() {
        let row = AuditRowBuilder::new("run-1", true)
            .stats(&RunStats::new())
            .transfer(&TransferResult::dry_run())
            .build();

        let line = format_row(&row);
        assert!(line.contains("dry-run"));
        assert!(line.contains("ok"));
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = StatusArgs { limit: 5 };
        assert_eq!(
            args.execute("does-not-exist.toml").await.unwrap(),
            EXIT_CONFIG_ERROR
        );
    }
}
