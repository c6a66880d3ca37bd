//! Domain error types
//!
//! This module defines the error hierarchy for stockfeed. Errors are
//! domain-specific and don't expose third-party types: driver, HTTP and FTP
//! errors are converted to messages at the adapter boundary.

use thiserror::Error;

/// Main stockfeed error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum StockfeedError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source datastore errors (fatal to a run)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// File transfer errors (captured as data by the transfer step)
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Audit log errors (reported and swallowed by the audit step)
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Artifact serialization errors
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Source datastore errors
///
/// Any of these aborts the run before a transfer is attempted.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the datastore
    #[error("Failed to connect to datastore: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The page query failed or was malformed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A page violated the ascending-key contract
    #[error("Cursor contract violated: {0}")]
    OutOfOrder(String),

    /// The configured column candidates did not match the source table
    #[error("Unrecognized schema: {0}")]
    UnrecognizedSchema(String),

    /// A row could not be decoded
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// File transfer errors
#[derive(Debug, Error)]
pub enum TransferError {
    /// Host, username or password missing before connecting
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Failed to connect to the file server
    #[error("Failed to connect to file server: {0}")]
    ConnectionFailed(String),

    /// TLS negotiation failed
    #[error("TLS negotiation failed: {0}")]
    Tls(String),

    /// Login rejected
    #[error("Login failed: {0}")]
    AuthenticationFailed(String),

    /// Upload command failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Directory listing failed
    #[error("Listing failed: {0}")]
    ListFailed(String),

    /// Upload reported success but the listing disagrees
    #[error("Verification mismatch: {0}")]
    VerificationMismatch(String),

    /// The blocking transfer task could not complete
    #[error("Transfer task failed: {0}")]
    TaskFailed(String),
}

/// Audit log errors
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to connect to the audit store
    #[error("Failed to connect to audit store: {0}")]
    ConnectionFailed(String),

    /// The store rejected the insert
    #[error("Insert rejected: {0}")]
    InsertFailed(String),

    /// Reading audit history failed
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for StockfeedError {
    fn from(err: std::io::Error) -> Self {
        StockfeedError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for StockfeedError {
    fn from(err: serde_json::Error) -> Self {
        StockfeedError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StockfeedError {
    fn from(err: toml::de::Error) -> Self {
        StockfeedError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for StockfeedError {
    fn from(err: csv::Error) -> Self {
        StockfeedError::Artifact(err.to_string())
    }
}
