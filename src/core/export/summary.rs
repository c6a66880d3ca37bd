//! Run summary and exit codes

use crate::core::transfer::TransferState;
use crate::domain::{RunStats, TransferResult};
use std::path::PathBuf;
use std::time::Duration;

/// Exit code when the artifact was produced (whatever the transfer did)
pub const EXIT_OK: i32 = 0;

/// Exit code when extraction, transformation or serialization failed
pub const EXIT_RUN_FAILED: i32 = 1;

/// Exit code for configuration errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code for fatal startup errors
pub const EXIT_FATAL: i32 = 5;

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Unique identifier of the run
    pub run_id: String,

    /// Whether the transfer was skipped
    pub dry_run: bool,

    /// Rows fetched from the datastore
    pub source_rows: u64,

    /// Rows rejected by the transformer
    pub rejected_rows: u64,

    /// Artifact statistics, when the artifact was produced
    pub stats: Option<RunStats>,

    /// Local artifact path, when the artifact was produced
    pub artifact_path: Option<PathBuf>,

    /// Transfer result, when a transfer was attempted or skipped
    pub transfer: Option<TransferResult>,

    /// Final state of the transfer step
    pub state: TransferState,

    /// Whether the audit row reached the audit log
    pub audit_written: bool,

    /// Error that aborted the run before transfer
    pub error: Option<String>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    /// Create an empty summary for a run
    pub fn new(run_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            run_id: run_id.into(),
            dry_run,
            source_rows: 0,
            rejected_rows: 0,
            stats: None,
            artifact_path: None,
            transfer: None,
            state: TransferState::Pending,
            audit_written: false,
            error: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the artifact was produced
    pub fn artifact_produced(&self) -> bool {
        self.stats.is_some() && self.error.is_none()
    }

    /// Whether the artifact was produced and the transfer succeeded
    pub fn is_successful(&self) -> bool {
        self.artifact_produced() && self.transfer.as_ref().is_some_and(|t| t.success)
    }

    /// Process exit code for this run
    ///
    /// Transfer and audit failures do not change it; only a run that never
    /// produced its artifact exits non-zero.
    pub fn exit_code(&self) -> i32 {
        if self.artifact_produced() {
            EXIT_OK
        } else {
            EXIT_RUN_FAILED
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let (lines, distinct_keys, total_quantity, bytes) = match &self.stats {
            Some(stats) => (
                stats.line_count,
                stats.distinct_key_count(),
                stats.total_quantity,
                stats.file_size_bytes,
            ),
            None => (0, 0, 0, 0),
        };

        tracing::info!(
            run_id = %self.run_id,
            dry_run = self.dry_run,
            source_rows = self.source_rows,
            rejected_rows = self.rejected_rows,
            lines,
            distinct_keys,
            total_quantity,
            bytes,
            state = %self.state,
            transfer_success = self.transfer.as_ref().map(|t| t.success),
            audit_written = self.audit_written,
            duration_ms = self.duration.as_millis() as u64,
            "Run summary"
        );

        if let Some(error) = &self.error {
            tracing::error!(run_id = %self.run_id, error = %error, "Run aborted");
        } else if let Some(transfer) = self.transfer.as_ref().filter(|t| !t.success) {
            tracing::warn!(
                run_id = %self.run_id,
                message = %transfer.message,
                "Artifact produced but not delivered"
            );
        }

        if !self.audit_written {
            tracing::warn!(run_id = %self.run_id, "Run outcome missing from audit log");
        }
    }
}
