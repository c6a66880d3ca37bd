//! File transport abstraction
//!
//! Sessions are synchronous: FTP control and data connections are blocking
//! I/O, so the whole transfer protocol runs on a blocking task and these calls
//! never touch the async runtime.

use super::listing::RemoteEntry;
use crate::domain::TransferError;
use std::path::Path;

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransferError>;

/// Opens authenticated sessions against the remote file server
pub trait FileTransport: Send + Sync {
    /// Whether sessions are TLS-protected
    fn is_secure(&self) -> bool;

    /// Connect, negotiate TLS if configured, and log in
    ///
    /// # Errors
    ///
    /// Returns a connection, TLS or authentication error.
    fn connect(&self) -> TransportResult<Box<dyn TransferSession>>;
}

/// One logged-in session
pub trait TransferSession: Send {
    /// List a remote directory
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::ListFailed`] if the listing fails.
    fn list(&mut self, remote_dir: &str) -> TransportResult<Vec<RemoteEntry>>;

    /// Upload a local file as `remote_dir/remote_name`, replacing any existing file
    ///
    /// A relative `remote_dir` resolves against the login directory, the same
    /// way [`list`](Self::list) resolves it. The working directory is left
    /// unchanged. Returns the number of bytes sent.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::UploadFailed`] if the upload fails.
    fn upload(
        &mut self,
        local_path: &Path,
        remote_dir: &str,
        remote_name: &str,
    ) -> TransportResult<u64>;

    /// End the session; failures are only logged
    fn quit(self: Box<Self>);
}
