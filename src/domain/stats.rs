//! Run statistics accumulated by the sink writer

use super::record::OutputRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Statistics for the artifact of one run
///
/// Mutated incrementally as records are written and finalized when the
/// artifact is closed. `line_count` counts data lines only (not the header).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of data lines written
    pub line_count: u64,

    /// Distinct part numbers written
    pub distinct_keys: HashSet<String>,

    /// Sum of written quantities
    pub total_quantity: i64,

    /// Size of the closed artifact in bytes (0 until finalized)
    pub file_size_bytes: u64,

    /// Hex SHA-256 of the closed artifact
    pub sha256: Option<String>,
}

impl RunStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one written record
    pub fn record(&mut self, record: &OutputRecord) {
        self.line_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(record.quantity);
        // Clone the key only the first time it is seen
        if !self.distinct_keys.contains(&record.part_number) {
            self.distinct_keys.insert(record.part_number.clone());
        }
    }

    /// Number of distinct part numbers
    pub fn distinct_key_count(&self) -> u64 {
        self.distinct_keys.len() as u64
    }
}
