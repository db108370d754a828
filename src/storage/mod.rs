//! Storage module for persisting extracted products
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Transactional batch inserts
//! - Reading stored products back

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

