//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use std::io::Write;
use std::sync::Mutex;
use stockfeed::config::{load_config, PassiveMode, SourceBackend};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("STOCKFEED_SOURCE_PAGE_SIZE");
    std::env::remove_var("STOCKFEED_TRANSFER_HOST");
    std::env::remove_var("STOCKFEED_TRANSFORM_RATIO");
    std::env::remove_var("STOCKFEED_APPLICATION_DRY_RUN");
    std::env::remove_var("TEST_STOCKFEED_PG_URL");
    std::env::remove_var("TEST_STOCKFEED_FTP_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[source]
backend = "postgresql"
table = "public.inventory"
page_size = 250

[source.columns]
id = ["item_id"]
part_number = ["sku", "part_number"]
quantity = ["on_hand"]

[postgresql]
connection_string = "postgresql://feed:pw@db.internal:5432/stock"
max_connections = 2
ssl_mode = "require"

[transform]
ratio = 0.5

[artifact]
local_dir = "/var/lib/stockfeed"
vendor = "ACME"
include_timestamp = true

[transfer]
host = "ftp.partner.example"
port = 2121
username = "feed"
password = "secret"
remote_dir = "/inbound"
remote_name = "stock.csv"
secure = true
passive_mode = "extended_passive"
strict_size = true

[audit]
table = "ops.feed_audit"
ensure_table = false

[logging]
local_enabled = false
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.source.backend, SourceBackend::PostgreSQL);
    assert_eq!(config.source.page_size, 250);
    assert_eq!(
        config.source.columns.part_number,
        vec!["sku", "part_number"]
    );
    assert_eq!(config.postgresql.as_ref().unwrap().ssl_mode, "require");
    assert_eq!(config.transform.ratio, 0.5);
    assert_eq!(config.artifact.vendor.as_deref(), Some("ACME"));
    assert_eq!(config.transfer.port, 2121);
    assert_eq!(config.transfer.passive_mode, PassiveMode::ExtendedPassive);
    assert!(config.transfer.strict_size);
    assert!(config.transfer.has_credentials());
    assert_eq!(config.audit.table, "ops.feed_audit");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
backend = "postgrest"
table = "inventory"

[postgrest]
url = "https://project.example.co/rest/v1"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.source.page_size, 1000);
    assert_eq!(config.source.columns.id, vec!["id"]);
    assert_eq!(config.transform.ratio, 0.8);
    assert_eq!(config.artifact.local_dir, "./out");
    assert_eq!(config.transfer.port, 21);
    assert_eq!(config.transfer.remote_dir, "/");
    assert!(!config.transfer.secure);
    assert!(!config.transfer.strict_size);
    assert!(!config.transfer.has_credentials());
    assert_eq!(config.audit.table, "export_audit_log");
    assert!(config.audit.ensure_table);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(
        "TEST_STOCKFEED_PG_URL",
        "postgresql://feed:pw@localhost:5432/stock",
    );
    std::env::set_var("TEST_STOCKFEED_FTP_PASSWORD", "from-env");

    let file = write_config(
        r#"
[source]
backend = "postgresql"
table = "inventory"

[postgresql]
connection_string = "${TEST_STOCKFEED_PG_URL}"

[transfer]
host = "ftp.partner.example"
username = "feed"
password = "${TEST_STOCKFEED_FTP_PASSWORD}"
remote_name = "inventory.csv"
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert!(config.transfer.has_credentials());
    assert!(config.postgresql.is_some());
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
backend = "postgresql"
table = "inventory"

[postgresql]
connection_string = "${TEST_STOCKFEED_PG_URL}"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_STOCKFEED_PG_URL"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("STOCKFEED_SOURCE_PAGE_SIZE", "50");
    std::env::set_var("STOCKFEED_TRANSFER_HOST", "ftp.staging.example");
    std::env::set_var("STOCKFEED_TRANSFORM_RATIO", "1.0");
    std::env::set_var("STOCKFEED_APPLICATION_DRY_RUN", "true");

    let file = write_config(
        r#"
[source]
backend = "postgrest"
table = "inventory"

[postgrest]
url = "http://localhost:3000"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.source.page_size, 50);
    assert_eq!(config.transfer.host, "ftp.staging.example");
    assert_eq!(config.transform.ratio, 1.0);
    assert!(config.application.dry_run);
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        // Backend section missing
        r#"
[source]
backend = "postgresql"
table = "inventory"

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
        // Non-positive ratio
        r#"
[source]
backend = "postgrest"
table = "inventory"

[postgrest]
url = "http://localhost:3000"

[transform]
ratio = 0.0

[transfer]
host = "ftp.partner.example"
remote_name = "inventory.csv"
"#,
        // Path separator in the remote name
        r#"
[source]
backend = "postgrest"
table = "inventory"

[postgrest]
url = "http://localhost:3000"

[transfer]
host = "ftp.partner.example"
remote_name = "../inventory.csv"
"#,
    ];

    for content in cases {
        let file = write_config(content);
        assert!(
            load_config(file.path()).is_err(),
            "expected validation failure for:{content}"
        );
    }
}
