//! Result batch and its append-only collector

use crate::crawler::record::ProductRecord;

/// Append-only builder for one run's records
///
/// Owned by the coordinator; workers never touch it. Each `append` adds one
/// page's records as a contiguous run.
#[derive(Debug, Default)]
pub struct BatchCollector {
    records: Vec<ProductRecord>,
    pages: usize,
}

impl BatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every record of one page task
    pub fn append(&mut self, records: Vec<ProductRecord>) {
        self.records.extend(records);
        self.pages += 1;
    }

    /// Number of page results appended so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Closes the collector; the batch is read-only from here on
    pub fn finalize(self) -> ResultBatch {
        ResultBatch {
            records: self.records,
        }
    }
}

/// The finalized, read-only set of records for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBatch {
    records: Vec<ProductRecord>,
}

impl ResultBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}

impl From<Vec<ProductRecord>> for ResultBatch {
    fn from(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a ResultBatch {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
