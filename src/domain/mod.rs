//! Domain models and types for stockfeed.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record models** ([`SourceRecord`], [`OutputRecord`])
//! - **Run outcome models** ([`RunStats`], [`TransferResult`], [`AuditRow`])
//! - **Error types** ([`StockfeedError`], [`SourceError`], [`TransferError`], [`AuditError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StockfeedError>`]:
//!
//! ```rust
//! use stockfeed::domain::{Result, StockfeedError};
//!
//! fn example() -> Result<()> {
//!     Err(StockfeedError::Validation("ratio must be positive".to_string()))
//! }
//! ```

pub mod audit;
pub mod errors;
pub mod record;
pub mod result;
pub mod stats;
pub mod transfer;

// Re-export commonly used types for convenience
pub use audit::{AuditRow, AuditRowBuilder};
pub use errors::{AuditError, SourceError, StockfeedError, TransferError};
pub use record::{OutputRecord, SourceRecord};
pub use result::Result;
pub use stats::RunStats;
pub use transfer::TransferResult;
