//! Transfer outcome model

use serde::{Deserialize, Serialize};

/// Outcome of pushing the artifact to the remote file server
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    /// Whether the upload was verified on the remote side
    pub success: bool,

    /// Size reported by the post-transfer listing
    pub remote_size_bytes: Option<u64>,

    /// Human-readable outcome
    pub message: String,
}

impl TransferResult {
    /// A verified upload
    pub fn transferred(remote_size_bytes: u64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            remote_size_bytes: Some(remote_size_bytes),
            message: message.into(),
        }
    }

    /// A failed or unverified upload
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            remote_size_bytes: None,
            message: message.into(),
        }
    }

    /// The transfer was skipped because the run is a dry run
    pub fn dry_run() -> Self {
        Self {
            success: true,
            remote_size_bytes: None,
            message: "Dry run: transfer skipped".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_result_constructors() {
        let ok = TransferResult::transferred(120, "uploaded");
        assert!(ok.success);
        assert_eq!(ok.remote_size_bytes, Some(120));

        let failed = TransferResult::failed("not found after upload");
        assert!(!failed.success);
        assert!(failed.remote_size_bytes.is_none());
        assert!(!failed.message.is_empty());

        let dry = TransferResult::dry_run();
        assert!(dry.success);
        assert!(dry.remote_size_bytes.is_none());
    }
}
