//! Transfer lifecycle states

use crate::domain::TransferResult;
use std::fmt;

/// Lifecycle of the transfer-and-audit step of one run
///
/// ```text
/// Pending -> Transferred | DryRun | TransferFailed -> Logged
/// ```
///
/// `Logged` is terminal and reachable from every other state: the audit row
/// is attempted whatever happened before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Artifact ready, nothing sent yet
    Pending,
    /// Uploaded and found in the remote listing
    Transferred,
    /// Transfer skipped on request
    DryRun,
    /// Upload or verification failed, or was never possible
    TransferFailed,
    /// Audit row attempted
    Logged,
}

impl TransferState {
    /// State reached from `Pending` for a given transfer result
    pub fn after(result: &TransferResult, dry_run: bool) -> Self {
        if dry_run && result.success {
            TransferState::DryRun
        } else if result.success {
            TransferState::Transferred
        } else {
            TransferState::TransferFailed
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferState::Pending => "pending",
            TransferState::Transferred => "transferred",
            TransferState::DryRun => "dry_run",
            TransferState::TransferFailed => "transfer_failed",
            TransferState::Logged => "logged",
        };
        f.write_str(name)
    }
}
