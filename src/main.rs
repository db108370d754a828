//! Pascal-Scraper main entry point
//!
//! This is the command-line interface for the Pascal-Scraper product harvester.

use anyhow::Context;
use clap::Parser;
use pascal_scraper::config::{load_config_with_hash, validate, Config};
use pascal_scraper::crawler::Coordinator;
use pascal_scraper::output::import_json;
use pascal_scraper::ScrapeError;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Pascal-Scraper: a product-listing harvester
///
/// Crawls every page of the listing, extracts one record per product and
/// writes the batch to a JSON file and/or a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "pascal-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A product-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when absent)
    #[arg(short, long, value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "import")]
    dry_run: bool,

    /// Load a JSON export into the database and exit
    #[arg(long, value_name = "JSON", conflicts_with = "dry_run")]
    import: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load(&cli.config)?;

    // Dropping the guard flushes the file writer, so it lives until main returns
    let _log_guard = setup_logging(cli.verbose, cli.quiet, config.logging.file.as_deref())?;
    match &config_hash {
        Some(hash) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            cli.config.display(),
            hash
        ),
        None => tracing::info!("No configuration file found, using defaults"),
    }

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if let Some(json_path) = &cli.import {
        handle_import(&config, json_path)
    } else {
        handle_crawl(&config).await
    }
}

/// Loads the config file, falling back to defaults when the default path is absent
fn load(path: &Path) -> anyhow::Result<(Config, Option<String>)> {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        let config = Config::default();
        validate(&config)?;
        return Ok((config, None));
    }

    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok((config, Some(hash)))
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events always go to stdout; a log file, when configured, receives the
/// same events without ANSI colours through a non-blocking writer.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pascal_scraper=info,warn"),
            1 => EnvFilter::new("pascal_scraper=debug,info"),
            2 => EnvFilter::new("pascal_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Pascal-Scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Worker pool size: {}", config.crawler.max_concurrent_pages_open);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Retry delay: {}ms", config.crawler.retry_delay_ms);

    println!("\nOutput:");
    if config.output.sink.writes_json() {
        println!("  JSON: {}", config.output.json_path);
    }
    if config.output.sink.writes_database() {
        println!("  Database: {}", config.output.database_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --import mode: loads a JSON export into the database
fn handle_import(config: &Config, json_path: &Path) -> anyhow::Result<()> {
    let database_path = Path::new(&config.output.database_path);
    tracing::info!(
        "Importing {} into {}",
        json_path.display(),
        database_path.display()
    );

    let imported = import_json(json_path, database_path)?;
    tracing::info!("Imported {} records", imported);
    println!("Data written to database");
    Ok(())
}

/// Handles the main crawl operation
///
/// Output is written only for a complete batch; an interrupted or failed run
/// leaves previous output files as they were.
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config)?;

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight pages");
            cancel.cancel();
        }
    });

    match coordinator.run_and_persist(&config.output).await {
        Ok(batch) => {
            tracing::info!("Persisted {} records", batch.len());
        }
        Err(e @ ScrapeError::Cancelled { .. }) => {
            tracing::warn!("{}; previous output left unchanged", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    }

    if config.output.sink.writes_json() {
        println!("JSON file successfully created");
    }
    if config.output.sink.writes_database() {
        println!("Data written to database");
    }
    Ok(())
}
