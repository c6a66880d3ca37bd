//! PostgreSQL adapter implementing the datastore traits
//!
//! One adapter serves both roles: keyset pagination over the inventory table
//! ([`SourceStore`]) and the append-only audit table ([`AuditSink`]). The two
//! share a single connection pool.

use crate::adapters::datastore::traits::{AuditSink, SourceStore};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::core::reader::SchemaMapping;
use crate::domain::record::parse_quantity_str;
use crate::domain::{AuditError, AuditRow, Result, SourceError, SourceRecord, StockfeedError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Row;

const AUDIT_MIGRATION: &str = include_str!("../../../migrations/001_audit_log.sql");
const MIGRATION_TABLE: &str = "export_audit_log";
const MIGRATION_INDEX: &str = "export_audit_log_timestamp_idx";

const AUDIT_COLUMNS: &str = r#""timestamp", run_id, dry_run, line_count, distinct_keys,
    total_quantity, file_size_bytes, remote_size_bytes, source_rows, rejected_rows,
    remote_name, remote_dir, transport_secure, success, message, duration_ms"#;

/// PostgreSQL implementation of the datastore traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
    audit_table: String,
}

impl PostgreSQLAdapter {
    /// Create an adapter on a shared client, writing audit rows to `audit_table`
    pub fn new(client: Arc<PostgreSQLClient>, audit_table: impl Into<String>) -> Self {
        Self {
            client,
            audit_table: audit_table.into(),
        }
    }
}

#[async_trait]
impl SourceStore for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client
            .test_connection()
            .await
            .map_err(SourceError::from)?;
        Ok(())
    }

    async fn discover_columns(&self, table: &str) -> Result<Option<Vec<String>>> {
        let (schema, name) = split_table(table);

        let query = r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = COALESCE($1::text, current_schema())
              AND table_name = $2
            ORDER BY ordinal_position
        "#;

        let rows = self
            .client
            .query(query, &[&schema, &name])
            .await
            .map_err(SourceError::from)?;

        if rows.is_empty() {
            return Err(SourceError::QueryFailed(format!(
                "table '{table}' does not exist or has no visible columns"
            ))
            .into());
        }

        let columns = rows
            .iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SourceError::InvalidRow(e.to_string()))?;

        tracing::debug!(table = %table, columns = ?columns, "Discovered source columns");
        Ok(Some(columns))
    }

    async fn fetch_page(
        &self,
        mapping: &SchemaMapping,
        cursor: Option<i64>,
        page_size: usize,
    ) -> Result<Vec<SourceRecord>> {
        let query = page_query(mapping);
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);

        tracing::trace!(cursor = ?cursor, limit, "Fetching page from PostgreSQL");

        let rows = self
            .client
            .query(&query, &[&cursor, &limit])
            .await
            .map_err(SourceError::from)?;

        rows.iter()
            .map(|row| decode_source_row(row).map_err(StockfeedError::from))
            .collect()
    }
}

#[async_trait]
impl AuditSink for PostgreSQLAdapter {
    async fn ensure_audit_table(&self) -> Result<()> {
        let script = migration_for(&self.audit_table);

        self.client
            .batch_execute(&script)
            .await
            .map_err(AuditError::from)?;

        tracing::info!(table = %self.audit_table, "Audit table ready");
        Ok(())
    }

    async fn append(&self, row: &AuditRow) -> Result<()> {
        let statement = format!(
            "INSERT INTO {} ({AUDIT_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
            quote_table(&self.audit_table)
        );

        self.client
            .execute(
                &statement,
                &[
                    &row.timestamp,
                    &row.run_id,
                    &row.dry_run,
                    &row.line_count,
                    &row.distinct_keys,
                    &row.total_quantity,
                    &row.file_size_bytes,
                    &row.remote_size_bytes,
                    &row.source_rows,
                    &row.rejected_rows,
                    &row.remote_name,
                    &row.remote_dir,
                    &row.transport_secure,
                    &row.success,
                    &row.message,
                    &row.duration_ms,
                ],
            )
            .await
            .map_err(AuditError::from)?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRow>> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM {} ORDER BY \"timestamp\" DESC LIMIT $1",
            quote_table(&self.audit_table)
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = self
            .client
            .query(&query, &[&limit])
            .await
            .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                decode_audit_row(row)
                    .map_err(|e| StockfeedError::from(AuditError::QueryFailed(e.to_string())))
            })
            .collect()
    }
}

/// Quote a single identifier, doubling embedded quotes
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an optionally schema-qualified table name
fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

fn split_table(table: &str) -> (Option<String>, String) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema.to_string()), name.to_string()),
        None => (None, table.to_string()),
    }
}

/// Keyset page query; `$1` is the cursor (NULL for the first page), `$2` the limit
fn page_query(mapping: &SchemaMapping) -> String {
    let id = quote_ident(&mapping.id);
    format!(
        "SELECT {id}::bigint, {}::text, {}::text FROM {} \
         WHERE ($1::bigint IS NULL OR {id} > $1) ORDER BY {id} ASC LIMIT $2",
        quote_ident(&mapping.part_number),
        quote_ident(&mapping.quantity),
        quote_table(&mapping.table),
    )
}

/// Audit migration rewritten for the configured table
///
/// The index name is swapped out first since it contains the table name.
fn migration_for(table: &str) -> String {
    const INDEX_SLOT: &str = "\u{0}index\u{0}";
    let index = format!("{}_timestamp_idx", table.replace('.', "_"));

    AUDIT_MIGRATION
        .replace(MIGRATION_INDEX, INDEX_SLOT)
        .replace(MIGRATION_TABLE, &quote_table(table))
        .replace(INDEX_SLOT, &quote_ident(&index))
}

fn decode_source_row(row: &Row) -> std::result::Result<SourceRecord, SourceError> {
    let id: i64 = row
        .try_get(0)
        .map_err(|e| SourceError::InvalidRow(format!("id: {e}")))?;
    let part_number: Option<String> = row
        .try_get(1)
        .map_err(|e| SourceError::InvalidRow(format!("part number of id {id}: {e}")))?;
    let quantity: Option<String> = row
        .try_get(2)
        .map_err(|e| SourceError::InvalidRow(format!("quantity of id {id}: {e}")))?;

    Ok(SourceRecord::new(
        id,
        part_number.unwrap_or_default(),
        quantity.as_deref().and_then(parse_quantity_str),
    ))
}

fn decode_audit_row(row: &Row) -> std::result::Result<AuditRow, tokio_postgres::Error> {
    Ok(AuditRow {
        timestamp: row.try_get("timestamp")?,
        run_id: row.try_get("run_id")?,
        dry_run: row.try_get("dry_run")?,
        line_count: row.try_get("line_count")?,
        distinct_keys: row.try_get("distinct_keys")?,
        total_quantity: row.try_get("total_quantity")?,
        file_size_bytes: row.try_get("file_size_bytes")?,
        remote_size_bytes: row.try_get("remote_size_bytes")?,
        source_rows: row.try_get("source_rows")?,
        rejected_rows: row.try_get("rejected_rows")?,
        remote_name: row.try_get("remote_name")?,
        remote_dir: row.try_get("remote_dir")?,
        transport_secure: row.try_get("transport_secure")?,
        success: row.try_get("success")?,
        message: row.try_get("message")?,
        duration_ms: row.try_get("duration_ms")?,
    })
}
