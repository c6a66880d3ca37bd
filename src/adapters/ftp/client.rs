//! FTP/FTPS transport built on suppaftp

use super::listing::RemoteEntry;
use super::traits::{FileTransport, TransferSession, TransportResult};
use crate::config::{PassiveMode, TransferConfig};
use crate::domain::TransferError;
use secrecy::ExposeSecret;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;
use suppaftp::native_tls::TlsConnector;
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};
use tracing::{debug, warn};

/// FTP transport for one remote server
///
/// Plain FTP by default; explicit FTPS (`AUTH TLS`) when `transfer.secure` is
/// set. Every session logs in, switches to binary mode and uses the configured
/// passive mode.
#[derive(Debug, Clone)]
pub struct FtpTransport {
    config: TransferConfig,
}

impl FtpTransport {
    /// Create a transport from the transfer section
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    fn open_stream(&self) -> TransportResult<NativeTlsFtpStream> {
        let host = self.config.host.as_str();
        let port = self.config.port;

        debug!(host = %host, port, secure = self.config.secure, "Connecting to file server");

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransferError::ConnectionFailed(format!("{host}:{port}: {e}")))?
            .next()
            .ok_or_else(|| {
                TransferError::ConnectionFailed(format!("{host}:{port}: no address resolved"))
            })?;

        let stream = NativeTlsFtpStream::connect_timeout(addr, self.timeout())
            .map_err(|e| TransferError::ConnectionFailed(format!("{host}:{port}: {e}")))?;

        stream
            .get_ref()
            .set_read_timeout(Some(self.timeout()))
            .map_err(|e| TransferError::ConnectionFailed(e.to_string()))?;

        if !self.config.secure {
            return Ok(stream);
        }

        let connector = TlsConnector::new().map_err(|e| TransferError::Tls(e.to_string()))?;
        stream
            .into_secure(NativeTlsConnector::from(connector), host)
            .map_err(|e| TransferError::Tls(e.to_string()))
    }
}

impl FileTransport for FtpTransport {
    fn is_secure(&self) -> bool {
        self.config.secure
    }

    fn connect(&self) -> TransportResult<Box<dyn TransferSession>> {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password)
        else {
            return Err(TransferError::MissingCredentials(
                "transfer.username and transfer.password are required".to_string(),
            ));
        };

        let mut stream = self.open_stream()?;

        stream.set_mode(match self.config.passive_mode {
            PassiveMode::Passive => suppaftp::Mode::Passive,
            PassiveMode::ExtendedPassive => suppaftp::Mode::ExtendedPassive,
        });

        let password: &str = password.expose_secret().as_ref();
        debug!(username = %username, "Logging in");
        stream
            .login(username.as_str(), password)
            .map_err(|e| TransferError::AuthenticationFailed(e.to_string()))?;

        stream
            .transfer_type(suppaftp::types::FileType::Binary)
            .map_err(|e| {
                TransferError::ConnectionFailed(format!("Failed to set binary mode: {e}"))
            })?;

        Ok(Box::new(FtpSession { stream }))
    }
}

/// Logged-in FTP session
struct FtpSession {
    stream: NativeTlsFtpStream,
}

impl TransferSession for FtpSession {
    fn list(&mut self, remote_dir: &str) -> TransportResult<Vec<RemoteEntry>> {
        let lines = self
            .stream
            .list(Some(remote_dir))
            .map_err(|e| TransferError::ListFailed(format!("{remote_dir}: {e}")))?;

        Ok(lines
            .iter()
            .filter_map(|line| RemoteEntry::parse(line))
            .collect())
    }

    fn upload(
        &mut self,
        local_path: &Path,
        remote_dir: &str,
        remote_name: &str,
    ) -> TransportResult<u64> {
        let mut reader = std::fs::File::open(local_path).map_err(|e| {
            TransferError::UploadFailed(format!("{}: {e}", local_path.display()))
        })?;

        // STOR replaces an existing file of the same name
        let target = remote_file(remote_dir, remote_name);
        self.stream
            .put_file(&target, &mut reader)
            .map_err(|e| TransferError::UploadFailed(format!("{target}: {e}")))
    }

    fn quit(mut self: Box<Self>) {
        if let Err(e) = self.stream.quit() {
            warn!(error = %e, "Failed to quit FTP session gracefully");
        }
    }
}

/// STOR target relative to the login directory, like the LIST argument
fn remote_file(remote_dir: &str, remote_name: &str) -> String {
    format!("{}/{remote_name}", remote_dir.trim_end_matches('/'))
}
