//! Datastore factory
//!
//! This module builds the source and audit clients selected by
//! `source.backend`.

use crate::adapters::datastore::traits::{AuditSink, SourceStore};
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgrest::PostgRestClient;
use crate::config::schema::{SourceBackend, StockfeedConfig};
use crate::domain::{Result, StockfeedError};
use std::sync::Arc;

/// Source and audit handles backed by the same client
pub struct Datastore {
    /// Inventory source
    pub source: Arc<dyn SourceStore>,

    /// Audit log
    pub audit: Arc<dyn AuditSink>,
}

/// Create the datastore handles based on the configuration
///
/// Both handles share one underlying client, so PostgreSQL runs reuse a single
/// connection pool. No connection is opened here.
///
/// # Errors
///
/// Returns a configuration error if the section for the selected backend is
/// missing or the client cannot be built.
pub async fn create_datastore(config: &StockfeedConfig) -> Result<Datastore> {
    match config.source.backend {
        SourceBackend::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                StockfeedError::Configuration(
                    "postgresql configuration is required when source.backend = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL client");
            let client = Arc::new(PostgreSQLClient::new(pg_config.clone()).await?);
            tracing::debug!(database = %client.connection_string_safe(), "PostgreSQL pool ready");
            let adapter = Arc::new(PostgreSQLAdapter::new(client, config.audit.table.clone()));

            Ok(Datastore {
                source: adapter.clone() as Arc<dyn SourceStore>,
                audit: adapter as Arc<dyn AuditSink>,
            })
        }
        SourceBackend::PostgREST => {
            let rest_config = config.postgrest.as_ref().ok_or_else(|| {
                StockfeedError::Configuration(
                    "postgrest configuration is required when source.backend = 'postgrest'"
                        .to_string(),
                )
            })?;

            tracing::info!(url = %rest_config.url, "Creating PostgREST client");
            let client = Arc::new(PostgRestClient::new(
                rest_config,
                config.audit.table.clone(),
            )?);

            Ok(Datastore {
                source: client.clone() as Arc<dyn SourceStore>,
                audit: client as Arc<dyn AuditSink>,
            })
        }
    }
}
