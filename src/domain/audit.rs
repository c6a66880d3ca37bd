//! Audit row model
//!
//! One [`AuditRow`] is appended to the audit log per run, including runs that
//! failed before an artifact existed. Numeric fields that could not be
//! computed are `None` and stored as `NULL`.

use super::stats::RunStats;
use super::transfer::TransferResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record of one run's outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    /// When the row was built
    pub timestamp: DateTime<Utc>,

    /// Unique identifier of the run
    pub run_id: String,

    /// Whether the transfer was skipped
    pub dry_run: bool,

    /// Data lines written to the artifact
    pub line_count: Option<i64>,

    /// Distinct part numbers written
    pub distinct_keys: Option<i64>,

    /// Sum of adjusted quantities
    pub total_quantity: Option<i64>,

    /// Local artifact size
    pub file_size_bytes: Option<i64>,

    /// Size reported by the remote listing
    pub remote_size_bytes: Option<i64>,

    /// Rows fetched from the datastore
    pub source_rows: Option<i64>,

    /// Rows rejected by the transformer
    pub rejected_rows: Option<i64>,

    /// Remote file name
    pub remote_name: String,

    /// Remote directory
    pub remote_dir: String,

    /// Whether the session used TLS
    pub transport_secure: bool,

    /// Overall run outcome
    pub success: bool,

    /// Outcome detail
    pub message: String,

    /// Wall-clock duration of the run
    pub duration_ms: i64,
}

/// Builder for [`AuditRow`]
///
/// Starts as a failed row with empty statistics; callers fill in what the run
/// actually produced.
///
/// # Examples
///
/// ```
/// use stockfeed::domain::audit::AuditRowBuilder;
/// use stockfeed::domain::TransferResult;
///
/// let row = AuditRowBuilder::new("run-1", false)
///     .remote("/inbound", "inventory.csv", true)
///     .transfer(&TransferResult::failed("connection refused"))
///     .build();
///
/// assert!(!row.success);
/// assert!(row.line_count.is_none());
/// ```
pub struct AuditRowBuilder {
    row: AuditRow,
}

impl AuditRowBuilder {
    /// Create a builder for the given run
    pub fn new(run_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            row: AuditRow {
                timestamp: Utc::now(),
                run_id: run_id.into(),
                dry_run,
                line_count: None,
                distinct_keys: None,
                total_quantity: None,
                file_size_bytes: None,
                remote_size_bytes: None,
                source_rows: None,
                rejected_rows: None,
                remote_name: String::new(),
                remote_dir: String::new(),
                transport_secure: false,
                success: false,
                message: String::new(),
                duration_ms: 0,
            },
        }
    }

    /// Set the remote target description
    pub fn remote(
        mut self,
        remote_dir: impl Into<String>,
        remote_name: impl Into<String>,
        transport_secure: bool,
    ) -> Self {
        self.row.remote_dir = remote_dir.into();
        self.row.remote_name = remote_name.into();
        self.row.transport_secure = transport_secure;
        self
    }

    /// Copy artifact statistics
    pub fn stats(mut self, stats: &RunStats) -> Self {
        self.row.line_count = Some(to_i64(stats.line_count));
        self.row.distinct_keys = Some(to_i64(stats.distinct_key_count()));
        self.row.total_quantity = Some(stats.total_quantity);
        self.row.file_size_bytes = Some(to_i64(stats.file_size_bytes));
        self
    }

    /// Set extraction counters
    pub fn extraction(mut self, source_rows: u64, rejected_rows: u64) -> Self {
        self.row.source_rows = Some(to_i64(source_rows));
        self.row.rejected_rows = Some(to_i64(rejected_rows));
        self
    }

    /// Take outcome and message from a transfer result
    pub fn transfer(mut self, result: &TransferResult) -> Self {
        self.row.success = result.success;
        self.row.remote_size_bytes = result.remote_size_bytes.map(to_i64);
        self.row.message = result.message.clone();
        self
    }

    /// Mark the run as failed before transfer
    pub fn failure(mut self, message: impl Into<String>) -> Self {
        self.row.success = false;
        self.row.remote_size_bytes = None;
        self.row.message = message.into();
        self
    }

    /// Set the run duration
    pub fn duration(mut self, duration: std::time::Duration) -> Self {
        self.row.duration_ms = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self
    }

    /// Build the row
    pub fn build(self) -> AuditRow {
        self.row
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
