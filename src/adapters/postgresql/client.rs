//! PostgreSQL client implementation
//!
//! This module provides the pooled client for interacting with PostgreSQL.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{AuditError, Result, SourceError, StockfeedError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// Failure talking to PostgreSQL, before the caller gives it a domain meaning
#[derive(Debug, thiserror::Error)]
pub enum PgFailure {
    /// No connection could be checked out of the pool
    #[error("Failed to get connection from pool: {0}")]
    Pool(String),

    /// The statement was rejected or failed
    #[error("{0}")]
    Statement(String),
}

impl From<PgFailure> for SourceError {
    fn from(err: PgFailure) -> Self {
        match err {
            PgFailure::Pool(msg) => SourceError::ConnectionFailed(msg),
            PgFailure::Statement(msg) => SourceError::QueryFailed(msg),
        }
    }
}

impl From<PgFailure> for AuditError {
    fn from(err: PgFailure) -> Self {
        match err {
            PgFailure::Pool(msg) => AuditError::ConnectionFailed(msg),
            PgFailure::Statement(msg) => AuditError::InsertFailed(msg),
        }
    }
}

/// PostgreSQL client for stockfeed
///
/// Connections are opened lazily by the pool; building a client never
/// touches the network.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// `ssl_mode` from the configuration overrides any `sslmode` in the
    /// connection string. `disable` connects in plain text; `prefer` and
    /// `require` go through native-tls without certificate verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed or the pool
    /// cannot be built.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                StockfeedError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let ssl_mode = match config.ssl_mode.as_str() {
            "disable" => SslMode::Disable,
            "require" => SslMode::Require,
            _ => SslMode::Prefer,
        };
        pg_config.ssl_mode(ssl_mode);

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if ssl_mode == SslMode::Disable {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(|e| {
                    StockfeedError::Configuration(format!("Failed to build TLS connector: {e}"))
                })?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| {
                StockfeedError::Configuration(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> std::result::Result<(), PgFailure> {
        self.query("SELECT 1", &[]).await?;
        tracing::info!(
            database = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    async fn get_connection(&self) -> std::result::Result<deadpool_postgres::Object, PgFailure> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| PgFailure::Pool(e.to_string()))?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            PgFailure::Statement(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    ///
    /// # Errors
    ///
    /// Returns [`PgFailure::Pool`] when no connection is available and
    /// [`PgFailure::Statement`] when the query fails.
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> std::result::Result<Vec<Row>, PgFailure> {
        let client = self.get_connection().await?;

        client
            .query(query, params)
            .await
            .map_err(|e| PgFailure::Statement(describe(&e)))
    }

    /// Execute a statement and return the number of affected rows
    ///
    /// # Errors
    ///
    /// Returns [`PgFailure::Pool`] when no connection is available and
    /// [`PgFailure::Statement`] when the statement fails.
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> std::result::Result<u64, PgFailure> {
        let client = self.get_connection().await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| PgFailure::Statement(describe(&e)))
    }

    /// Run a multi-statement script without parameters
    pub async fn batch_execute(&self, script: &str) -> std::result::Result<(), PgFailure> {
        let client = self.get_connection().await?;

        client
            .batch_execute(script)
            .await
            .map_err(|e| PgFailure::Statement(describe(&e)))
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        let connection_string = self.config.connection_string.expose_secret();
        format!("postgresql://***@{}", connection_string.redacted_endpoint())
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

/// Server errors carry their message in `as_db_error`; the top-level Display
/// only says "db error"
fn describe(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => format!("{} ({})", db.message(), db.code().code()),
        None => err.to_string(),
    }
}
