//! Pascal-Scraper: a product-listing harvester
//!
//! This crate crawls a paginated product listing, extracts one record per
//! product block on every page, and persists the aggregated batch to a JSON
//! file and/or a SQLite database.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Pascal-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP status {status} for {url} after {attempts} attempts")]
    HttpStatus {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("Pagination discovery failed for {url}: {reason}")]
    Discovery { url: String, reason: String },

    #[error("All {pages} page fetches failed")]
    AllPagesFailed { pages: usize },

    #[error("Persistence error: {0}")]
    Persistence(#[from] output::PersistenceError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl cancelled after {completed} of {discovered} pages")]
    Cancelled { completed: usize, discovered: usize },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Pascal-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchCollector, Coordinator, ProductRecord, ResultBatch};
pub use state::CrawlState;
