//! Fixed-size paging over a filtered result for the raw-data viewer.

use tracing::debug;

use crate::record::TripRecord;
use crate::store::FilteredResult;

pub const PAGE_SIZE: usize = 5;

/// A forward-only cursor over one [`FilteredResult`].
///
/// A pager is tied to the result it was created from; a new filter session
/// needs a new pager.
#[derive(Debug)]
pub struct RawRecordPager<'a> {
    records: &'a [&'a TripRecord],
    cursor: usize,
}

impl<'a> RawRecordPager<'a> {
    pub fn new(result: &'a FilteredResult<'a>) -> Self {
        Self {
            records: result.records(),
            cursor: 0,
        }
    }

    /// Returns the next `PAGE_SIZE` records and advances the cursor.
    /// Once past the end, every call returns an empty page.
    pub fn next_page(&mut self) -> &'a [&'a TripRecord] {
        let start = self.cursor.min(self.records.len());
        let end = (start + PAGE_SIZE).min(self.records.len());
        self.cursor = self.cursor.saturating_add(PAGE_SIZE);

        debug!(start, end, total = self.records.len(), "Raw page served");
        &self.records[start..end]
    }

    /// Index of the first record the next call will return.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.records.len()
    }
}
