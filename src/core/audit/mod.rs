//! Audit logging of run outcomes
//!
//! Every `run` appends exactly one [`crate::domain::AuditRow`]. The
//! [`AuditRecorder`] is consumed by the write, so a second append for the same
//! run does not type-check. A failed append is reported on the diagnostic log
//! and swallowed; it is never retried and never changes the exit code.

use crate::adapters::datastore::AuditSink;
use crate::core::transfer::TransferState;
use crate::domain::AuditRow;
use std::sync::Arc;

/// Single-use writer of a run's audit row
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Create the recorder for one run
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append `row` once
    ///
    /// Returns `true` when the sink accepted the row. The state after this
    /// call is always [`TransferState::Logged`].
    pub async fn record(self, row: &AuditRow) -> (TransferState, bool) {
        let written = match self.sink.append(row).await {
            Ok(()) => {
                tracing::info!(
                    run_id = %row.run_id,
                    success = row.success,
                    dry_run = row.dry_run,
                    "Audit row written"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    run_id = %row.run_id,
                    success = row.success,
                    message = %row.message,
                    error = %e,
                    "Failed to write audit row"
                );
                false
            }
        };

        (TransferState::Logged, written)
    }
}
