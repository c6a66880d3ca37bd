//! Integration tests for dry-run mode
//!
//! A dry run writes the artifact and its audit row but never contacts the
//! file server.

mod common;

use common::{example_rows, test_config, MemoryAudit, MemoryServer, MemoryTable};
use std::fs;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stockfeed::cli::commands::run::RunArgs;
use stockfeed::core::export::{PipelineRunner, EXIT_OK};
use stockfeed::domain::TransferResult;
use tempfile::TempDir;

#[tokio::test]
async fn test_dry_run_skips_transfer() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, 2);
    config.application.dry_run = true;

    let audit = Arc::new(MemoryAudit::default());
    let server = Arc::new(MemoryServer::default());
    let runner = PipelineRunner::new(
        &config,
        Arc::new(MemoryTable::new(example_rows())),
        audit.clone(),
        server.clone(),
    );
    let summary = runner.run().await;

    assert_eq!(summary.exit_code(), EXIT_OK);
    assert!(summary.dry_run);
    assert_eq!(summary.transfer, Some(TransferResult::dry_run()));
    assert_eq!(server.connects.load(Ordering::SeqCst), 0);
    assert_eq!(server.file_count(), 0);

    let local = fs::read_to_string(dir.path().join("inventory.csv")).unwrap();
    assert_eq!(local, "partNumber,quantity\nA1,8\nB2,1\n");

    let rows = audit.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].dry_run);
    assert_eq!(rows[0].line_count, Some(2));
    assert_eq!(rows[0].remote_size_bytes, None);
}

#[test]
fn test_cli_flag_enables_dry_run() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, 2);
    assert!(!config.application.dry_run);

    RunArgs {
        dry_run: true,
        ..RunArgs::default()
    }
    .apply_overrides(&mut config);

    assert!(config.application.dry_run);
}

#[test]
fn test_cli_without_flag_keeps_configured_dry_run() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, 2);
    config.application.dry_run = true;

    RunArgs::default().apply_overrides(&mut config);

    assert!(config.application.dry_run);
}
