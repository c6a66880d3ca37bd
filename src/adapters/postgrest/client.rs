//! PostgREST client implementation
//!
//! Talks to a PostgREST-compatible endpoint (for example a hosted Postgres
//! REST API). Pagination uses the same keyset contract as the PostgreSQL
//! backend: `id=gt.<cursor>`, ordered ascending, limited to the page size.
//! Requests are never retried.

use crate::adapters::datastore::traits::{AuditSink, SourceStore};
use crate::config::schema::PostgRestConfig;
use crate::core::reader::SchemaMapping;
use crate::domain::record::{parse_quantity, part_number_from_value};
use crate::domain::{AuditError, AuditRow, Result, SourceError, SourceRecord, StockfeedError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::time::Duration;

/// PostgREST datastore client
///
/// Serves both as the inventory source and as the audit log.
pub struct PostgRestClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// API key sent as `apikey` and bearer token
    api_key: Option<String>,

    /// Audit resource, optionally schema-qualified
    audit_table: String,
}

/// Transport-level failure, classified before the caller picks a domain error
#[derive(Debug)]
enum RestFailure {
    Timeout(String),
    Connection(String),
    Unauthorized(String),
    Status(String),
    Body(String),
}

impl From<RestFailure> for SourceError {
    fn from(err: RestFailure) -> Self {
        match err {
            RestFailure::Timeout(msg) => SourceError::Timeout(msg),
            RestFailure::Connection(msg) => SourceError::ConnectionFailed(msg),
            RestFailure::Unauthorized(msg) => SourceError::AuthenticationFailed(msg),
            RestFailure::Status(msg) => SourceError::QueryFailed(msg),
            RestFailure::Body(msg) => SourceError::InvalidRow(msg),
        }
    }
}

impl RestFailure {
    fn into_audit(self, on_status: fn(String) -> AuditError) -> AuditError {
        match self {
            RestFailure::Timeout(msg) | RestFailure::Connection(msg) => {
                AuditError::ConnectionFailed(msg)
            }
            RestFailure::Unauthorized(msg) | RestFailure::Status(msg) => on_status(msg),
            RestFailure::Body(msg) => AuditError::QueryFailed(msg),
        }
    }
}

impl PostgRestClient {
    /// Create a new PostgREST client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &PostgRestConfig, audit_table: impl Into<String>) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                StockfeedError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
            api_key: config
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().as_ref().to_string()),
            audit_table: audit_table.into(),
        })
    }

    /// Base URL of the endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request for a resource, with auth and schema profile headers applied
    ///
    /// `schema.table` is addressed as `/table` with the schema selected through
    /// the `Accept-Profile` (reads) or `Content-Profile` (writes) header.
    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        let (schema, resource) = match table.split_once('.') {
            Some((schema, resource)) => (Some(schema), resource),
            None => (None, table),
        };
        let profile_header = if method == reqwest::Method::GET {
            "Accept-Profile"
        } else {
            "Content-Profile"
        };

        let mut request = self
            .client
            .request(method, format!("{}/{}", self.base_url, resource));

        if let Some(schema) = schema {
            request = request.header(profile_header, schema);
        }
        if let Some(ref key) = self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, RestFailure> {
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RestFailure::Timeout(e.to_string())
            } else {
                RestFailure::Connection(e.to_string())
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = format!("request failed with status {status}: {body}");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RestFailure::Unauthorized(message))
            }
            _ => Err(RestFailure::Status(message)),
        }
    }

    async fn fetch_json(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Vec<Value>, RestFailure> {
        self.send(request)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RestFailure::Timeout(e.to_string())
                } else {
                    RestFailure::Body(format!("invalid JSON response: {e}"))
                }
            })
    }
}

#[async_trait]
impl SourceStore for PostgRestClient {
    fn backend_name(&self) -> &'static str {
        "postgrest"
    }

    async fn test_connection(&self) -> Result<()> {
        let request = self.client.get(format!("{}/", self.base_url));
        let request = match self.api_key {
            Some(ref key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => request,
        };

        self.send(request).await.map_err(SourceError::from)?;
        tracing::info!(url = %self.base_url, "PostgREST connection test successful");
        Ok(())
    }

    async fn discover_columns(&self, table: &str) -> Result<Option<Vec<String>>> {
        let request = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*"), ("limit", "1")]);

        let rows = self.fetch_json(request).await.map_err(SourceError::from)?;

        match rows.first() {
            Some(Value::Object(row)) => {
                let columns: Vec<String> = row.keys().cloned().collect();
                tracing::debug!(table = %table, columns = ?columns, "Discovered source columns");
                Ok(Some(columns))
            }
            Some(other) => Err(SourceError::InvalidRow(format!(
                "expected a JSON object per row, got {other}"
            ))
            .into()),
            None => {
                tracing::debug!(table = %table, "Source table is empty; column discovery skipped");
                Ok(None)
            }
        }
    }

    async fn fetch_page(
        &self,
        mapping: &SchemaMapping,
        cursor: Option<i64>,
        page_size: usize,
    ) -> Result<Vec<SourceRecord>> {
        let mut params = vec![
            ("select".to_string(), select_clause(mapping)),
            ("order".to_string(), format!("{}.asc", mapping.id)),
            ("limit".to_string(), page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push((mapping.id.clone(), format!("gt.{cursor}")));
        }

        tracing::trace!(cursor = ?cursor, limit = page_size, "Fetching page from PostgREST");

        let request = self
            .request(reqwest::Method::GET, &mapping.table)
            .query(&params);
        let rows = self.fetch_json(request).await.map_err(SourceError::from)?;

        rows.iter()
            .map(|row| decode_source_row(row).map_err(StockfeedError::from))
            .collect()
    }
}

#[async_trait]
impl AuditSink for PostgRestClient {
    async fn ensure_audit_table(&self) -> Result<()> {
        tracing::debug!(
            table = %self.audit_table,
            "PostgREST cannot create tables; the audit table must be provisioned up front"
        );
        Ok(())
    }

    async fn append(&self, row: &AuditRow) -> Result<()> {
        let request = self
            .request(reqwest::Method::POST, &self.audit_table)
            .header("Prefer", "return=minimal")
            .json(row);

        self.send(request)
            .await
            .map_err(|e| e.into_audit(AuditError::InsertFailed))?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRow>> {
        let request = self
            .request(reqwest::Method::GET, &self.audit_table)
            .query(&[
                ("order", "timestamp.desc".to_string()),
                ("limit", limit.to_string()),
            ]);

        let rows = self
            .fetch_json(request)
            .await
            .map_err(|e| e.into_audit(AuditError::QueryFailed))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value::<AuditRow>(row).map_err(|e| {
                    let message = format!("invalid audit row: {e}");
                    StockfeedError::from(AuditError::QueryFailed(message))
                })
            })
            .collect()
    }
}

/// `select` parameter aliasing the mapped columns to fixed names
fn select_clause(mapping: &SchemaMapping) -> String {
    format!(
        "id:{},part_number:{},quantity:{}",
        mapping.id, mapping.part_number, mapping.quantity
    )
}

fn decode_source_row(row: &Value) -> std::result::Result<SourceRecord, SourceError> {
    let fields: &Map<String, Value> = row
        .as_object()
        .ok_or_else(|| SourceError::InvalidRow(format!("expected a JSON object, got {row}")))?;

    let id = match fields.get("id") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| SourceError::InvalidRow(format!("missing or non-integer id in {row}")))?;

    let part_number = fields
        .get("part_number")
        .map(part_number_from_value)
        .unwrap_or_default();
    let quantity = fields.get("quantity").and_then(parse_quantity);

    Ok(SourceRecord::new(id, part_number, quantity))
}
