//! Transfer of the finished artifact to the partner's file server
//!
//! [`TransferAgent`] runs the upload-then-verify protocol over a
//! [`crate::adapters::ftp::FileTransport`] and always yields a
//! [`crate::domain::TransferResult`]; [`TransferState`] tracks where the run
//! stands until the audit row is written.

pub mod agent;
pub mod state;

pub use agent::{TransferAgent, TransferOutcome};
pub use state::TransferState;
