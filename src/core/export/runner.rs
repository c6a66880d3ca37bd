//! Pipeline runner - orchestrates one export run
//!
//! Reader, transformer and writer run strictly in sequence and produce the
//! artifact; the transfer then runs on it, and the audit row is written last
//! whatever happened before.

use crate::adapters::datastore::{create_datastore, AuditSink, SourceStore};
use crate::adapters::ftp::{FileTransport, FtpTransport};
use crate::config::{ArtifactConfig, SourceConfig, StockfeedConfig, TransformConfig};
use crate::core::audit::AuditRecorder;
use crate::core::export::summary::RunSummary;
use crate::core::reader::{CursorReader, SchemaMapping};
use crate::core::sink::{ArtifactLayout, FinishedArtifact, SinkWriter};
use crate::core::transfer::TransferAgent;
use crate::core::transform::RecordTransformer;
use crate::domain::{AuditRowBuilder, Result};
use crate::{log_run_complete, log_run_start};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Runs the export-transform-transfer-audit pipeline
pub struct PipelineRunner {
    source: Arc<dyn SourceStore>,
    audit: Arc<dyn AuditSink>,
    agent: TransferAgent,
    source_config: SourceConfig,
    transform: TransformConfig,
    artifact: ArtifactConfig,
    remote_dir: String,
    remote_name: String,
    dry_run: bool,
}

impl PipelineRunner {
    /// Create a runner from already-built collaborators
    ///
    /// Each component receives its own configuration section; nothing is read
    /// from the environment after this point.
    pub fn new(
        config: &StockfeedConfig,
        source: Arc<dyn SourceStore>,
        audit: Arc<dyn AuditSink>,
        transport: Arc<dyn FileTransport>,
    ) -> Self {
        Self {
            source,
            audit,
            agent: TransferAgent::new(transport, config.transfer.clone()),
            source_config: config.source.clone(),
            transform: config.transform.clone(),
            artifact: config.artifact.clone(),
            remote_dir: config.transfer.remote_dir.clone(),
            remote_name: config.transfer.remote_name.clone(),
            dry_run: config.application.dry_run,
        }
    }

    /// Create a runner with the configured datastore and FTP transport
    ///
    /// Bootstraps the audit table when `audit.ensure_table` is set; a failure
    /// there is logged and the run goes ahead.
    ///
    /// # Errors
    ///
    /// Returns an error if a datastore client cannot be built from the
    /// configuration.
    pub async fn from_config(config: &StockfeedConfig) -> Result<Self> {
        let datastore = create_datastore(config).await?;

        if config.audit.ensure_table {
            if let Err(e) = datastore.audit.ensure_audit_table().await {
                tracing::error!(
                    table = %config.audit.table,
                    error = %e,
                    "Failed to ensure audit table"
                );
            }
        }

        let transport = Arc::new(FtpTransport::new(config.transfer.clone()));

        Ok(Self::new(
            config,
            datastore.source,
            datastore.audit,
            transport,
        ))
    }

    /// Execute one run
    ///
    /// Never fails: errors before the transfer are recorded in the summary and
    /// in a failure audit row, transfer errors are recorded as the transfer
    /// result, and an audit write failure is logged.
    pub async fn run(&self) -> RunSummary {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();

        log_run_start!(run_id, self.source_config.table, self.dry_run);

        let mut summary = RunSummary::new(&run_id, self.dry_run);
        let builder = AuditRowBuilder::new(&run_id, self.dry_run).remote(
            &self.remote_dir,
            &self.remote_name,
            self.agent.is_secure(),
        );

        let row = match self.produce_artifact(started_at, &mut summary).await {
            Ok(artifact) => {
                let outcome = self
                    .agent
                    .transfer(&artifact.path, artifact.stats.file_size_bytes, self.dry_run)
                    .await;

                let row = builder
                    .stats(&artifact.stats)
                    .extraction(summary.source_rows, summary.rejected_rows)
                    .transfer(&outcome.result)
                    .duration(start.elapsed())
                    .build();

                summary.state = outcome.state;
                summary.transfer = Some(outcome.result);
                summary.stats = Some(artifact.stats);
                summary.artifact_path = Some(artifact.path);
                row
            }
            Err(e) => {
                tracing::error!(run_id = %run_id, error = %e, "Run failed before transfer");
                summary.error = Some(e.to_string());
                builder
                    .failure(format!("Run failed before transfer: {e}"))
                    .duration(start.elapsed())
                    .build()
            }
        };

        let (state, written) = AuditRecorder::new(Arc::clone(&self.audit))
            .record(&row)
            .await;
        summary.state = state;
        summary.audit_written = written;

        let summary = summary.with_duration(start.elapsed());
        let lines = summary.stats.as_ref().map_or(0, |s| s.line_count);
        log_run_complete!(run_id, lines, summary.is_successful(), summary.duration);
        summary.log_summary();

        summary
    }

    /// Read, transform and write; returns the closed artifact
    async fn produce_artifact(
        &self,
        started_at: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<FinishedArtifact> {
        let table = self.source_config.table.as_str();

        tracing::debug!(
            backend = self.source.backend_name(),
            table = %table,
            "Discovering source columns"
        );
        let available = self.source.discover_columns(table).await?;
        let mapping =
            SchemaMapping::resolve(table, &self.source_config.columns, available.as_deref())?;

        let mut reader = CursorReader::new(
            Arc::clone(&self.source),
            mapping,
            self.source_config.page_size,
        );
        let transformer = RecordTransformer::new(self.transform.ratio);
        let layout = ArtifactLayout::from_config(&self.artifact, started_at);
        let mut writer = SinkWriter::create(&self.artifact.local_dir, &self.remote_name, layout)?;

        while let Some(page) = reader.next_page().await? {
            summary.source_rows += page.len() as u64;

            for record in &page {
                match transformer.transform(record) {
                    Some(line) => writer.write(&line)?,
                    None => {
                        summary.rejected_rows += 1;
                        tracing::trace!(id = record.id, "Record rejected");
                    }
                }
            }
        }

        tracing::info!(
            source_rows = summary.source_rows,
            rejected_rows = summary.rejected_rows,
            pages = reader.pages_fetched(),
            "Extraction complete"
        );

        writer.finalize()
    }
}
