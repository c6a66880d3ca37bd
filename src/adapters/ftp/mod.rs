//! Remote file server integration
//!
//! [`FileTransport`] opens sessions and [`TransferSession`] lists and uploads;
//! [`FtpTransport`] implements both over FTP with optional explicit TLS.

pub mod client;
pub mod listing;
pub mod traits;

pub use client::FtpTransport;
pub use listing::RemoteEntry;
pub use traits::{FileTransport, TransferSession, TransportResult};
