//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one run through its states:
//! - Fetching the root page and discovering pagination
//! - Fanning page tasks out to the worker pool
//! - Aggregating every page's records into one batch
//! - Reporting the run

use crate::config::{validate, Config, CrawlerConfig, OutputConfig};
use crate::crawler::batch::{BatchCollector, ResultBatch};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pagination::discover;
use crate::crawler::scheduler::Scheduler;
use crate::output::{build_sink, Sink};
use crate::state::CrawlState;
use crate::ScrapeError;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs returned by pagination discovery (root included)
    pub pages_discovered: usize,

    /// Page tasks that fetched successfully
    pub pages_succeeded: usize,

    /// Page tasks whose fetch failed
    pub pages_failed: usize,

    /// Records in the final batch
    pub records: usize,

    /// Whether the run was cancelled before every URL was taken
    pub cancelled: bool,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Page tasks that reported back
    pub fn pages_completed(&self) -> usize {
        self.pages_succeeded + self.pages_failed
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    crawler: CrawlerConfig,
    fetcher: Fetcher,
    state: CrawlState,
    cancel: CancellationToken,
    span: tracing::Span,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a coordinator with a reqwest-backed fetcher
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - The config is invalid or the HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        validate(config)?;
        let fetcher = Fetcher::from_config(&config.crawler)?;
        Ok(Self::with_fetcher(config.crawler.clone(), fetcher))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(crawler: CrawlerConfig, fetcher: Fetcher) -> Self {
        let span = tracing::info_span!("crawl", root = %crawler.root_url);
        Self {
            crawler,
            fetcher,
            state: CrawlState::Init,
            cancel: CancellationToken::new(),
            span,
            report: CrawlReport::default(),
        }
    }

    /// Token that stops dispatching new page tasks when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), ScrapeError> {
        if !self.state.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn fail(&mut self, error: ScrapeError) -> ScrapeError {
        tracing::error!("Crawl failed: {}", error);
        if let Err(e) = self.transition(CrawlState::Failed) {
            return e;
        }
        error
    }

    /// Runs the crawl once and returns the finalized batch
    ///
    /// A coordinator runs at most once; a second call reports an invalid
    /// transition.
    pub async fn run(&mut self) -> Result<ResultBatch, ScrapeError> {
        let span = self.span.clone();
        self.run_inner().instrument(span).await
    }

    /// Runs the crawl and hands the finished batch to the configured sink(s)
    ///
    /// Sinks are opened only once the batch is complete, so a failed or
    /// cancelled run leaves existing output files untouched.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pascal_scraper::config::Config;
    /// use pascal_scraper::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default();
    /// let mut coordinator = Coordinator::new(&config)?;
    /// let batch = coordinator.run_and_persist(&config.output).await?;
    /// println!("{} products", batch.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_and_persist(
        &mut self,
        output: &OutputConfig,
    ) -> Result<ResultBatch, ScrapeError> {
        let batch = self.run().await?;
        let sink = build_sink(output)?;
        sink.persist(&batch)?;
        Ok(batch)
    }

    async fn run_inner(&mut self) -> Result<ResultBatch, ScrapeError> {
        let start_time = Instant::now();
        let root_url = self.crawler.root_url.clone();

        // Init -> Discovering
        self.transition(CrawlState::Discovering)?;
        tracing::info!("Fetching root page {}", root_url);

        let root_page = match self.fetcher.fetch(&root_url).await.into_result() {
            Ok(page) => page,
            Err(failure) => return Err(self.fail(failure.into())),
        };

        let discovered = discover(&root_page.document(), &root_url);
        let urls = match discovered {
            Ok(urls) => urls,
            Err(e) => return Err(self.fail(e)),
        };
        tracing::info!("Discovered {} pages to crawl", urls.len());
        self.report.pages_discovered = urls.len();

        // Discovering -> Fetching
        self.transition(CrawlState::Fetching)?;
        let scheduler = Scheduler::new(
            self.fetcher.clone(),
            self.crawler.max_concurrent_pages_open as usize,
            self.cancel.clone(),
        );
        let mut dispatch = scheduler.dispatch(urls);
        let mut collector = BatchCollector::new();

        while let Some(outcome) = dispatch.next_outcome().await {
            if outcome.is_failure() {
                self.report.pages_failed += 1;
            } else {
                self.report.pages_succeeded += 1;
            }
            collector.append(outcome.records);
        }
        dispatch.join().await;

        self.report.cancelled = self.cancel.is_cancelled()
            && self.report.pages_completed() < self.report.pages_discovered;
        if self.report.cancelled {
            let completed = self.report.pages_completed();
            let discovered = self.report.pages_discovered;
            return Err(self.fail(ScrapeError::Cancelled {
                completed,
                discovered,
            }));
        }

        if self.report.pages_completed() > 0 && self.report.pages_succeeded == 0 {
            let pages = self.report.pages_failed;
            return Err(self.fail(ScrapeError::AllPagesFailed { pages }));
        }

        // Fetching -> Aggregating -> Done
        self.transition(CrawlState::Aggregating)?;
        let batch = collector.finalize();
        self.report.records = batch.len();
        self.report.elapsed = start_time.elapsed();
        self.transition(CrawlState::Done)?;

        tracing::info!(
            "Crawl completed: {} records from {} pages ({} failed) in {:?}",
            self.report.records,
            self.report.pages_succeeded,
            self.report.pages_failed,
            self.report.elapsed
        );

        Ok(batch)
    }
}
