//! Datastore abstraction traits
//!
//! This module defines the traits that datastore backends must implement to
//! serve as the inventory source and as the audit log.

use crate::core::reader::SchemaMapping;
use crate::domain::{AuditRow, Result, SourceRecord};
use async_trait::async_trait;

/// Read side of the datastore: keyset pagination over the inventory table
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Test the datastore connection
    ///
    /// # Errors
    ///
    /// Returns an error if the datastore is unreachable or rejects the credentials.
    async fn test_connection(&self) -> Result<()>;

    /// Report the column names of `table`
    ///
    /// Returns `Ok(None)` when the backend cannot tell (for example an empty
    /// table behind a REST API).
    ///
    /// # Errors
    ///
    /// Returns a source error if the table does not exist or the lookup fails.
    async fn discover_columns(&self, table: &str) -> Result<Option<Vec<String>>>;

    /// Fetch up to `page_size` records with `id > cursor`, ordered by id ascending
    ///
    /// A `None` cursor starts from the beginning of the table.
    ///
    /// # Errors
    ///
    /// Returns a source error on any transport or query failure. Errors are
    /// never retried by callers.
    async fn fetch_page(
        &self,
        mapping: &SchemaMapping,
        cursor: Option<i64>,
        page_size: usize,
    ) -> Result<Vec<SourceRecord>>;
}

/// Append-only audit log
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Create the audit table if the backend supports it
    ///
    /// # Errors
    ///
    /// Returns an audit error if the table cannot be created.
    async fn ensure_audit_table(&self) -> Result<()>;

    /// Append one row
    ///
    /// # Errors
    ///
    /// Returns an audit error if the row was not persisted.
    async fn append(&self, row: &AuditRow) -> Result<()>;

    /// Most recent rows, newest first
    ///
    /// # Errors
    ///
    /// Returns an audit error if the log cannot be read.
    async fn recent(&self, limit: usize) -> Result<Vec<AuditRow>>;
}
