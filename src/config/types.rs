use serde::Deserialize;

/// Listing page crawled when no configuration overrides it
pub const DEFAULT_ROOT_URL: &str = "https://www.pascalcoste-shopping.com/esthetique/fond-de-teint.html";

/// Main configuration structure for Pascal-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Listing page that carries the pagination region
    #[serde(rename = "root-url", default = "default_root_url")]
    pub root_url: String,

    /// Size of the fetch worker pool
    #[serde(
        rename = "max-concurrent-pages-open",
        default = "default_max_concurrent_pages_open"
    )]
    pub max_concurrent_pages_open: u32,

    /// Timeout applied to every single request attempt (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Additional attempts after the first one on a non-2xx status
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts, multiplied by the attempt number (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            max_concurrent_pages_open: default_max_concurrent_pages_open(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Where the finalized batch goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Json,
    Database,
    Both,
}

impl SinkKind {
    pub fn writes_json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn writes_database(&self) -> bool {
        matches!(self, Self::Database | Self::Both)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Which sink(s) receive the batch
    #[serde(default = "default_sink")]
    pub sink: SinkKind,

    /// Path of the JSON array file
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sink: default_sink(),
            json_path: default_json_path(),
            database_path: default_database_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Optional file that receives a copy of every log line
    #[serde(default)]
    pub file: Option<String>,
}

fn default_root_url() -> String {
    DEFAULT_ROOT_URL.to_string()
}

fn default_max_concurrent_pages_open() -> u32 {
    8
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_sink() -> SinkKind {
    SinkKind::Json
}

fn default_json_path() -> String {
    "pascal_coste.json".to_string()
}

fn default_database_path() -> String {
    "pascal_coste.db".to_string()
}
