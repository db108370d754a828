//! Database schema definitions
//!
//! This module contains the SQL schema for the product database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per extracted product
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(255),
    brand VARCHAR(255),
    productUrl VARCHAR(255),
    price VARCHAR(20),
    imageUrl VARCHAR(255),
    timeStamp DATETIME
);

CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
