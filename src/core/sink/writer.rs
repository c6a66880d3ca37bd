//! Streaming CSV writer for the partner artifact

use super::checksum::checksum_file;
use crate::config::ArtifactConfig;
use crate::domain::{OutputRecord, Result, RunStats, StockfeedError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Column layout of the artifact
///
/// The first two columns are fixed; `vendor` and `exportedAt` are appended
/// only when configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Constant value of the `vendor` column
    pub vendor: Option<String>,

    /// Constant value of the `exportedAt` column
    pub exported_at: Option<String>,
}

impl ArtifactLayout {
    /// Layout for a run started at `run_started`
    pub fn from_config(config: &ArtifactConfig, run_started: DateTime<Utc>) -> Self {
        Self {
            vendor: config.vendor.as_ref().map(|v| v.trim().to_string()),
            exported_at: config
                .include_timestamp
                .then(|| run_started.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    fn header(&self) -> Vec<&str> {
        let mut header = vec!["partNumber", "quantity"];
        if self.vendor.is_some() {
            header.push("vendor");
        }
        if self.exported_at.is_some() {
            header.push("exportedAt");
        }
        header
    }
}

/// A closed artifact and the statistics of what was written into it
#[derive(Debug, Clone)]
pub struct FinishedArtifact {
    /// Final path of the artifact
    pub path: PathBuf,

    /// Final statistics, including size and checksum
    pub stats: RunStats,
}

/// Writes accepted records into the artifact as they arrive
///
/// Lines go to `<name>.partial` and the file is renamed into place by
/// [`SinkWriter::finalize`], so a half-written artifact never carries the
/// final name. `finalize` consumes the writer; the artifact is closed exactly
/// once.
///
/// # Example
///
/// ```rust,no_run
/// use stockfeed::core::sink::{ArtifactLayout, SinkWriter};
/// use stockfeed::domain::OutputRecord;
///
/// # fn example() -> stockfeed::domain::Result<()> {
/// let mut writer = SinkWriter::create("./out", "inventory.csv", ArtifactLayout::default())?;
/// writer.write(&OutputRecord { part_number: "A1".to_string(), quantity: 8 })?;
/// let artifact = writer.finalize()?;
/// assert_eq!(artifact.stats.line_count, 1);
/// # Ok(())
/// # }
/// ```
pub struct SinkWriter {
    writer: csv::Writer<File>,
    layout: ArtifactLayout,
    partial_path: PathBuf,
    final_path: PathBuf,
    stats: RunStats,
}

impl SinkWriter {
    /// Create the artifact in `dir` and write the header
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(dir: impl AsRef<Path>, file_name: &str, layout: ArtifactLayout) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            StockfeedError::Artifact(format!(
                "Failed to create artifact directory {}: {e}",
                dir.display()
            ))
        })?;

        let final_path = dir.join(file_name);
        let partial_path = dir.join(format!("{file_name}.partial"));

        let file = File::create(&partial_path).map_err(|e| {
            StockfeedError::Artifact(format!(
                "Failed to create artifact {}: {e}",
                partial_path.display()
            ))
        })?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        writer.write_record(layout.header())?;

        tracing::debug!(path = %final_path.display(), "Artifact opened");

        Ok(Self {
            writer,
            layout,
            partial_path,
            final_path,
            stats: RunStats::new(),
        })
    }

    /// Append one record and update the statistics
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    pub fn write(&mut self, record: &OutputRecord) -> Result<()> {
        let quantity = record.quantity.to_string();
        let mut fields: Vec<&str> = vec![record.part_number.as_str(), quantity.as_str()];
        if let Some(vendor) = &self.layout.vendor {
            fields.push(vendor);
        }
        if let Some(exported_at) = &self.layout.exported_at {
            fields.push(exported_at);
        }

        self.writer.write_record(&fields)?;
        self.stats.record(record);
        Ok(())
    }

    /// Statistics so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Flush, close and move the artifact into place
    ///
    /// Valid with zero records written (header-only artifact).
    ///
    /// # Errors
    ///
    /// Returns an error if flushing, renaming or checksumming fails.
    pub fn finalize(self) -> Result<FinishedArtifact> {
        let Self {
            writer,
            partial_path,
            final_path,
            mut stats,
            ..
        } = self;

        let file = writer.into_inner().map_err(|e| {
            StockfeedError::Artifact(format!("Failed to flush artifact: {}", e.error()))
        })?;
        file.sync_all()?;
        drop(file);

        fs::rename(&partial_path, &final_path).map_err(|e| {
            StockfeedError::Artifact(format!(
                "Failed to move artifact into place at {}: {e}",
                final_path.display()
            ))
        })?;

        stats.file_size_bytes = fs::metadata(&final_path)?.len();
        stats.sha256 = Some(checksum_file(&final_path)?);

        tracing::info!(
            path = %final_path.display(),
            lines = stats.line_count,
            distinct_keys = stats.distinct_key_count(),
            total_quantity = stats.total_quantity,
            bytes = stats.file_size_bytes,
            sha256 = stats.sha256.as_deref().unwrap_or_default(),
            "Artifact finalized"
        );

        Ok(FinishedArtifact {
            path: final_path,
            stats,
        })
    }
}
