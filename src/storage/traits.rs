//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::ProductRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid timestamp in row {id}: '{value}'")]
    Timestamp { id: i64, value: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for product storage backends
pub trait Storage {
    /// Inserts every record in one transaction
    ///
    /// Either all rows are committed or none are.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn insert_batch(&mut self, records: &[ProductRecord]) -> StorageResult<usize>;

    /// Counts stored products
    fn count_products(&self) -> StorageResult<u64>;

    /// Loads every stored product in insertion order
    fn load_products(&self) -> StorageResult<Vec<ProductRecord>>;
}
