//! Upload-then-verify protocol

use super::state::TransferState;
use crate::adapters::ftp::{FileTransport, RemoteEntry, TransferSession};
use crate::config::TransferConfig;
use crate::domain::{TransferError, TransferResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of the transfer step
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// State reached from `Pending`
    pub state: TransferState,

    /// Result recorded in the audit row
    pub result: TransferResult,
}

/// Pushes the finished artifact to the partner and checks it arrived
///
/// Never returns an error: every failure on the way becomes a failed
/// [`TransferResult`].
pub struct TransferAgent {
    transport: Arc<dyn FileTransport>,
    config: TransferConfig,
}

impl TransferAgent {
    /// Create an agent for the configured target
    pub fn new(transport: Arc<dyn FileTransport>, config: TransferConfig) -> Self {
        Self { transport, config }
    }

    /// Whether sessions are TLS-protected
    pub fn is_secure(&self) -> bool {
        self.transport.is_secure()
    }

    /// Run the transfer for `artifact`
    ///
    /// With `dry_run` nothing is contacted. Otherwise:
    ///
    /// 1. missing credentials fail before any connection
    /// 2. connect and log in
    /// 3. list the remote directory (diagnostic only)
    /// 4. upload to the fixed remote name, replacing the previous file
    /// 5. list again and look the name up
    /// 6. success when it is listed with a size (and, with `strict_size`, the
    ///    size equals `local_size`)
    pub async fn transfer(
        &self,
        artifact: &Path,
        local_size: u64,
        dry_run: bool,
    ) -> TransferOutcome {
        let result = if dry_run {
            info!(path = %artifact.display(), "Dry run: skipping transfer");
            TransferResult::dry_run()
        } else if !self.config.has_credentials() {
            warn!(host = %self.config.host, "Transfer skipped: credentials missing");
            TransferResult::failed(
                TransferError::MissingCredentials(
                    "transfer.username and transfer.password are required".to_string(),
                )
                .to_string(),
            )
        } else {
            self.upload_and_verify(artifact.to_path_buf(), local_size)
                .await
                .unwrap_or_else(|e| TransferResult::failed(e.to_string()))
        };

        let state = TransferState::after(&result, dry_run);
        if result.success {
            info!(
                state = %state,
                remote = %self.config.remote_path(),
                remote_size_bytes = ?result.remote_size_bytes,
                "Transfer finished"
            );
        } else {
            warn!(
                state = %state,
                remote = %self.config.remote_path(),
                message = %result.message,
                "Transfer failed"
            );
        }

        TransferOutcome { state, result }
    }

    async fn upload_and_verify(
        &self,
        artifact: PathBuf,
        local_size: u64,
    ) -> Result<TransferResult, TransferError> {
        let transport = Arc::clone(&self.transport);
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let mut session = transport.connect()?;
            let outcome = run_protocol(session.as_mut(), &config, &artifact, local_size);
            session.quit();
            outcome
        })
        .await
        .map_err(|e| TransferError::TaskFailed(e.to_string()))?
    }
}

fn run_protocol(
    session: &mut dyn TransferSession,
    config: &TransferConfig,
    artifact: &Path,
    local_size: u64,
) -> Result<TransferResult, TransferError> {
    let dir = config.remote_dir.as_str();
    let name = config.remote_name.as_str();

    match session.list(dir) {
        Ok(entries) => debug!(
            dir = %dir,
            entries = entries.len(),
            previous = ?find(&entries, name).and_then(|e| e.size),
            "Remote directory before upload"
        ),
        Err(e) => warn!(dir = %dir, error = %e, "Pre-upload listing failed"),
    }

    let sent = session.upload(artifact, dir, name)?;
    debug!(remote = %config.remote_path(), bytes = sent, "Upload complete");

    let entries = session.list(dir)?;
    let entry = find(&entries, name).ok_or_else(|| {
        TransferError::VerificationMismatch(format!("'{name}' not listed in {dir} after upload"))
    })?;

    let remote_size = entry.size.ok_or_else(|| {
        TransferError::VerificationMismatch(format!("'{name}' listed without a size"))
    })?;

    if config.strict_size && remote_size != local_size {
        return Err(TransferError::VerificationMismatch(format!(
            "remote size {remote_size} bytes differs from local size {local_size} bytes"
        )));
    }

    Ok(TransferResult::transferred(
        remote_size,
        format!(
            "Uploaded {} ({remote_size} bytes remote, {local_size} bytes local)",
            config.remote_path()
        ),
    ))
}

fn find<'a>(entries: &'a [RemoteEntry], name: &str) -> Option<&'a RemoteEntry> {
    entries.iter().find(|entry| entry.matches(name))
}
