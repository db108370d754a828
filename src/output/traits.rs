//! Sink trait and error types
//!
//! A sink receives the finalized batch of a run and writes it somewhere
//! durable, all or nothing.

use crate::crawler::ResultBatch;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while persisting a batch
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to lock storage: {0}")]
    Lock(String),
}

/// Result type for sink operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Trait for batch sinks
///
/// Implementations must leave no partial output behind when they fail.
pub trait Sink {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Writes the whole batch
    fn persist(&self, batch: &ResultBatch) -> PersistenceResult<()>;
}
