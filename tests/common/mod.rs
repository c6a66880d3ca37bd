//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stockfeed::adapters::datastore::{AuditSink, SourceStore};
use stockfeed::adapters::ftp::{FileTransport, RemoteEntry, TransferSession, TransportResult};
use stockfeed::config::{
    secret_string, ApplicationConfig, ArtifactConfig, AuditConfig, ColumnCandidates,
    LoggingConfig, PassiveMode, SourceBackend, SourceConfig, StockfeedConfig, TransferConfig,
    TransformConfig,
};
use stockfeed::core::reader::SchemaMapping;
use stockfeed::domain::{AuditError, AuditRow, Result, SourceError, SourceRecord, TransferError};
use tempfile::TempDir;

/// Inventory table held in memory, served in id order
pub struct MemoryTable {
    rows: Vec<SourceRecord>,
    fail_after_pages: Option<usize>,
    pub fetches: AtomicUsize,
}

impl MemoryTable {
    pub fn new(mut rows: Vec<SourceRecord>) -> Self {
        rows.sort_by_key(|r| r.id);
        Self {
            rows,
            fail_after_pages: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Serve `pages` pages, then fail every later fetch
    pub fn failing_after(mut self, pages: usize) -> Self {
        self.fail_after_pages = Some(pages);
        self
    }
}

#[async_trait]
impl SourceStore for MemoryTable {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn discover_columns(&self, _table: &str) -> Result<Option<Vec<String>>> {
        Ok(Some(vec![
            "id".to_string(),
            "part_number".to_string(),
            "quantity".to_string(),
        ]))
    }

    async fn fetch_page(
        &self,
        _mapping: &SchemaMapping,
        cursor: Option<i64>,
        page_size: usize,
    ) -> Result<Vec<SourceRecord>> {
        let fetched = self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_after_pages.is_some_and(|limit| fetched >= limit) {
            return Err(
                SourceError::ConnectionFailed("server closed the connection".to_string()).into(),
            );
        }

        Ok(self
            .rows
            .iter()
            .filter(|r| cursor.map_or(true, |c| r.id > c))
            .take(page_size)
            .cloned()
            .collect())
    }
}

/// Audit log held in memory
#[derive(Default)]
pub struct MemoryAudit {
    rows: Mutex<Vec<AuditRow>>,
    reject_inserts: bool,
    pub appends: AtomicUsize,
}

impl MemoryAudit {
    /// An audit sink whose inserts always fail
    pub fn rejecting() -> Self {
        Self {
            reject_inserts: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<AuditRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAudit {
    async fn ensure_audit_table(&self) -> Result<()> {
        Ok(())
    }

    async fn append(&self, row: &AuditRow) -> Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.reject_inserts {
            return Err(AuditError::InsertFailed("permission denied for table".to_string()).into());
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRow>> {
        Ok(self.rows().into_iter().rev().take(limit).collect())
    }
}

/// File server holding uploads in memory
#[derive(Default)]
pub struct MemoryServer {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub connects: AtomicUsize,
    unreachable: bool,
}

impl MemoryServer {
    /// A server that refuses every connection
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Content of `remote_dir/remote_name`, if uploaded
    pub fn file(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl FileTransport for MemoryServer {
    fn is_secure(&self) -> bool {
        true
    }

    fn connect(&self) -> TransportResult<Box<dyn TransferSession>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(TransferError::ConnectionFailed(
                "connection refused".to_string(),
            ));
        }
        Ok(Box::new(MemorySession {
            files: Arc::clone(&self.files),
        }))
    }
}

struct MemorySession {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl TransferSession for MemorySession {
    fn list(&mut self, remote_dir: &str) -> TransportResult<Vec<RemoteEntry>> {
        let prefix = format!("{}/", remote_dir.trim_end_matches('/'));
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(path, bytes)| {
                path.strip_prefix(&prefix)
                    .map(|name| RemoteEntry::file(name, bytes.len() as u64))
            })
            .collect())
    }

    fn upload(
        &mut self,
        local_path: &Path,
        remote_dir: &str,
        remote_name: &str,
    ) -> TransportResult<u64> {
        let bytes =
            std::fs::read(local_path).map_err(|e| TransferError::UploadFailed(e.to_string()))?;
        let size = bytes.len() as u64;
        let path = format!("{}/{}", remote_dir.trim_end_matches('/'), remote_name);
        self.files.lock().unwrap().insert(path, bytes);
        Ok(size)
    }

    fn quit(self: Box<Self>) {}
}

/// Configuration writing artifacts into `dir`
pub fn test_config(dir: &TempDir, page_size: usize) -> StockfeedConfig {
    StockfeedConfig {
        application: ApplicationConfig::default(),
        source: SourceConfig {
            backend: SourceBackend::PostgreSQL,
            table: "inventory".to_string(),
            page_size,
            columns: ColumnCandidates::default(),
        },
        postgresql: None,
        postgrest: None,
        transform: TransformConfig { ratio: 0.8 },
        artifact: ArtifactConfig {
            local_dir: dir.path().display().to_string(),
            vendor: None,
            include_timestamp: false,
        },
        transfer: TransferConfig {
            host: "ftp.partner.example".to_string(),
            port: 21,
            username: Some("feed".to_string()),
            password: Some(secret_string("pw".to_string())),
            remote_dir: "/inbound".to_string(),
            remote_name: "inventory.csv".to_string(),
            secure: true,
            passive_mode: PassiveMode::Passive,
            timeout_seconds: 5,
            strict_size: false,
        },
        audit: AuditConfig::default(),
        logging: LoggingConfig::console_only(),
    }
}

/// The three-row table used by the end-to-end tests
pub fn example_rows() -> Vec<SourceRecord> {
    vec![
        SourceRecord::new(1, "A1", Some(10.0)),
        SourceRecord::new(2, "", Some(5.0)),
        SourceRecord::new(3, "B2", Some(1.0)),
    ]
}
