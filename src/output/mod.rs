//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the batch to a JSON array file
//! - Inserting the batch into the product database
//! - Importing a previously written JSON file into the database

mod json;
mod sqlite_output;
mod traits;

pub use json::{load_json, write_json, JsonFileSink};
pub use sqlite_output::SqliteSink;
pub use traits::{PersistenceError, PersistenceResult, Sink};

use crate::config::OutputConfig;
use crate::crawler::ResultBatch;
use std::path::Path;

/// Runs several sinks in order, stopping at the first failure
pub struct MultiSink {
    sinks: Vec<Box<dyn Sink + Send + Sync>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn Sink + Send + Sync>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for MultiSink {
    fn name(&self) -> &'static str {
        "multi"
    }

    fn persist(&self, batch: &ResultBatch) -> PersistenceResult<()> {
        for sink in &self.sinks {
            tracing::debug!("Persisting {} records to {} sink", batch.len(), sink.name());
            sink.persist(batch)?;
        }
        Ok(())
    }
}

/// Builds the sink(s) selected by the output configuration
///
/// JSON comes before the database when both are enabled.
pub fn build_sink(config: &OutputConfig) -> PersistenceResult<MultiSink> {
    let mut sinks: Vec<Box<dyn Sink + Send + Sync>> = Vec::new();

    if config.sink.writes_json() {
        sinks.push(Box::new(JsonFileSink::new(&config.json_path)));
    }
    if config.sink.writes_database() {
        sinks.push(Box::new(SqliteSink::open(Path::new(&config.database_path))?));
    }

    Ok(MultiSink::new(sinks))
}

/// Loads a JSON export and writes it to the database in one transaction
///
/// # Returns
///
/// The number of records imported
pub fn import_json(json_path: &Path, database_path: &Path) -> PersistenceResult<usize> {
    let records = load_json(json_path)?;
    let batch = ResultBatch::from(records);
    SqliteSink::open(database_path)?.persist(&batch)?;
    Ok(batch.len())
}
