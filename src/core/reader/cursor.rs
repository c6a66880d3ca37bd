//! Cursor-based pagination over the source table

use crate::adapters::datastore::SourceStore;
use crate::core::reader::SchemaMapping;
use crate::domain::{Result, SourceError, SourceRecord};
use crate::log_page_fetched;
use std::sync::Arc;

/// Pages through the source table in strictly increasing id order
///
/// The cursor is the highest id seen so far. It only moves forward; a page that
/// would move it backwards, or that is longer than requested, aborts the run.
/// Reading stops after a short or empty page, so a table of `N` rows is read in
/// at most `N / page_size + 1` fetches.
pub struct CursorReader {
    store: Arc<dyn SourceStore>,
    mapping: SchemaMapping,
    page_size: usize,
    cursor: Option<i64>,
    exhausted: bool,
    pages_fetched: u64,
    rows_read: u64,
}

impl CursorReader {
    /// Create a reader starting before the first row
    pub fn new(store: Arc<dyn SourceStore>, mapping: SchemaMapping, page_size: usize) -> Self {
        Self {
            store,
            mapping,
            page_size: page_size.max(1),
            cursor: None,
            exhausted: false,
            pages_fetched: 0,
            rows_read: 0,
        }
    }

    /// Fetch the next page
    ///
    /// Returns `Ok(None)` once the table is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates datastore errors unchanged and returns
    /// [`SourceError::OutOfOrder`] when a page breaks the ordering contract.
    pub async fn next_page(&mut self) -> Result<Option<Vec<SourceRecord>>> {
        if self.exhausted {
            return Ok(None);
        }

        let page = self
            .store
            .fetch_page(&self.mapping, self.cursor, self.page_size)
            .await?;
        self.pages_fetched += 1;

        self.check_page(&page)?;

        log_page_fetched!(self.pages_fetched, page.len(), self.cursor);

        if page.len() < self.page_size {
            self.exhausted = true;
        }

        let Some(last) = page.last() else {
            return Ok(None);
        };

        self.cursor = Some(last.id);
        self.rows_read += page.len() as u64;

        Ok(Some(page))
    }

    fn check_page(&self, page: &[SourceRecord]) -> Result<()> {
        if page.len() > self.page_size {
            return Err(SourceError::OutOfOrder(format!(
                "page of {} rows exceeds page size {}",
                page.len(),
                self.page_size
            ))
            .into());
        }

        let mut previous = self.cursor;
        for record in page {
            if let Some(prev) = previous {
                if record.id <= prev {
                    return Err(SourceError::OutOfOrder(format!(
                        "id {} does not follow {}",
                        record.id, prev
                    ))
                    .into());
                }
            }
            previous = Some(record.id);
        }

        Ok(())
    }

    /// Highest id read so far
    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    /// Rows returned by the datastore so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Number of fetches issued, including the final empty one
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }
}
