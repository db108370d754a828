//! SQLite-based sink implementation
//!
//! This module provides a sink that inserts the batch into the `products`
//! table of the storage backend in a single transaction.

use crate::crawler::ResultBatch;
use crate::output::traits::{PersistenceError, PersistenceResult, Sink};
use crate::storage::{SqliteStorage, Storage};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite-based sink
pub struct SqliteSink {
    storage: Arc<Mutex<dyn Storage + Send>>,
}

impl SqliteSink {
    /// Creates a sink over an existing storage backend
    pub fn new(storage: Arc<Mutex<dyn Storage + Send>>) -> Self {
        Self { storage }
    }

    /// Opens the database file and wraps it in a sink
    pub fn open(path: &Path) -> PersistenceResult<Self> {
        let storage = SqliteStorage::new(path)?;
        Ok(Self::new(Arc::new(Mutex::new(storage))))
    }
}

impl Sink for SqliteSink {
    fn name(&self) -> &'static str {
        "database"
    }

    fn persist(&self, batch: &ResultBatch) -> PersistenceResult<()> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|e| PersistenceError::Lock(e.to_string()))?;

        match storage.insert_batch(batch.records()) {
            Ok(inserted) => {
                tracing::info!("Data successfully inserted into the database ({} rows)", inserted);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error writing data to database, batch rolled back: {}", e);
                Err(e.into())
            }
        }
    }
}
