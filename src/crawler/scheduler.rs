//! Fixed-size worker pool for page tasks
//!
//! This module handles:
//! - A shared work queue of page URLs
//! - A bounded number of worker tasks draining it
//! - Publishing one `PageOutcome` per URL to the coordinator
//! - Honouring cancellation between tasks

use crate::crawler::extractor::extract_all;
use crate::crawler::fetcher::{FetchFailure, FetchResult, Fetcher};
use crate::crawler::record::ProductRecord;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// What one page task produced
#[derive(Debug)]
pub struct PageOutcome {
    /// The page URL
    pub url: String,

    /// Records extracted from the page (empty on failure)
    pub records: Vec<ProductRecord>,

    /// Set when the page could not be fetched
    pub failure: Option<FetchFailure>,
}

impl PageOutcome {
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// A running fan-out: outcomes stream in until every worker has exited
pub struct Dispatch {
    outcomes: mpsc::Receiver<PageOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatch {
    /// Next completed page, or `None` once all workers are done
    pub async fn next_outcome(&mut self) -> Option<PageOutcome> {
        self.outcomes.recv().await
    }

    /// Number of workers spawned for this dispatch
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker task to exit
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }
    }
}

/// Scheduler owns the pool size and the cancellation signal
///
/// Workers take URLs one at a time from a shared queue. Once the token is
/// cancelled no worker takes another URL; pages already being fetched finish
/// and report normally.
pub struct Scheduler {
    fetcher: Fetcher,
    pool_size: usize,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(fetcher: Fetcher, pool_size: usize, cancel: CancellationToken) -> Self {
        Self {
            fetcher,
            pool_size: pool_size.max(1),
            cancel,
        }
    }

    /// Queues every URL and spawns the workers
    ///
    /// Never spawns more workers than there are URLs.
    pub fn dispatch(&self, urls: Vec<String>) -> Dispatch {
        let worker_count = self.pool_size.min(urls.len());
        let capacity = urls.len().max(1);

        let (queue_tx, queue_rx) = mpsc::channel::<String>(capacity);
        for url in urls {
            // Capacity covers every URL, so this never waits
            if queue_tx.try_send(url).is_err() {
                tracing::error!("Work queue rejected a URL");
            }
        }
        drop(queue_tx);

        let queue = Arc::new(Mutex::new(queue_rx));
        let (outcome_tx, outcome_rx) = mpsc::channel::<PageOutcome>(capacity);

        let workers = (0..worker_count)
            .map(|id| {
                let fetcher = self.fetcher.clone();
                let queue = Arc::clone(&queue);
                let outcomes = outcome_tx.clone();
                let cancel = self.cancel.clone();
                tokio::spawn(
                    worker(fetcher, queue, outcomes, cancel)
                        .instrument(tracing::debug_span!("worker", id)),
                )
            })
            .collect();

        Dispatch {
            outcomes: outcome_rx,
            workers,
        }
    }
}

async fn worker(
    fetcher: Fetcher,
    queue: Arc<Mutex<mpsc::Receiver<String>>>,
    outcomes: mpsc::Sender<PageOutcome>,
    cancel: CancellationToken,
) {
    loop {
        let next = {
            let mut queue = queue.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                url = queue.recv() => url,
            }
        };

        let Some(url) = next else {
            break;
        };

        let outcome = process_page(&fetcher, url).await;
        if outcomes.send(outcome).await.is_err() {
            tracing::warn!("Coordinator stopped listening; worker exiting");
            break;
        }
    }
}

/// Fetches one page and extracts its products
///
/// Extraction only runs after this page's own fetch succeeded. A failed
/// fetch becomes an empty outcome carrying the failure.
pub async fn process_page(fetcher: &Fetcher, url: String) -> PageOutcome {
    match fetcher.fetch(&url).await {
        FetchResult::Success(page) => {
            let records = extract_all(&page.document());
            tracing::info!("Extracted {} products from {}", records.len(), url);
            PageOutcome {
                url,
                records,
                failure: None,
            }
        }
        FetchResult::Failure(failure) => {
            tracing::warn!("Skipping page {}: {}", url, failure);
            PageOutcome {
                url,
                records: Vec::new(),
                failure: Some(failure),
            }
        }
    }
}
