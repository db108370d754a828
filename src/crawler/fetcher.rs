//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with per-attempt timeouts
//! - A `Transport` seam so tests can stub the network
//! - Bounded retry on non-2xx statuses
//! - Error classification into transport vs. status failures

use crate::config::CrawlerConfig;
use crate::crawler::headers::{HeaderGenerator, RandomHeaders};
use crate::ScrapeError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Status line and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The request never produced a status (connection, DNS, TLS, timeout, body read)
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            TransportError(format!("Connection failed: {}", e))
        } else {
            TransportError(e.to_string())
        }
    }
}

/// Issues one GET request with the given headers
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<RawResponse, TransportError>;
}

/// `Transport` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// A page that answered 2xx
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Raw markup
    pub body: String,

    /// Attempts it took to get a 2xx
    pub attempts: u32,
}

impl FetchedPage {
    /// Parses the body into a queryable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Why a fetch gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP {status} for {url} after {attempts} attempts")]
    HttpStatus {
        url: String,
        status: u16,
        attempts: u32,
    },
}

impl From<FetchFailure> for ScrapeError {
    fn from(failure: FetchFailure) -> Self {
        match failure {
            FetchFailure::Transport { url, reason } => ScrapeError::Transport { url, reason },
            FetchFailure::HttpStatus {
                url,
                status,
                attempts,
            } => ScrapeError::HttpStatus {
                url,
                status,
                attempts,
            },
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The page answered 2xx within the retry budget
    Success(FetchedPage),

    /// Transport error, or non-2xx on every attempt
    Failure(FetchFailure),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result`, for callers that treat failure as fatal
    pub fn into_result(self) -> Result<FetchedPage, FetchFailure> {
        match self {
            Self::Success(page) => Ok(page),
            Self::Failure(failure) => Err(failure),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Headers are not fixed on the client; each attempt carries its own set.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages with a bounded, call-scoped retry loop
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | Other HTTP status | Retry up to `max_retries` times, fresh headers each time |
/// | Transport error / timeout | Immediate failure, no retry |
///
/// The attempt counter lives inside each `fetch` call, so concurrent fetches
/// of unrelated URLs never consume each other's budget.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    headers: Arc<dyn HeaderGenerator>,
    max_retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        headers: Arc<dyn HeaderGenerator>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            transport,
            headers,
            max_retries,
            retry_delay,
        }
    }

    /// Builds a reqwest-backed fetcher with randomized headers
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            Arc::new(ReqwestTransport::new(client)),
            Arc::new(RandomHeaders::new()),
            config.max_retries,
            Duration::from_millis(config.retry_delay_ms),
        ))
    }

    /// Total attempts allowed per URL (first try plus retries)
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Fetches a URL, retrying non-2xx statuses
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            let headers = self.headers.generate();

            let response = match self.transport.get(url, &headers).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Transport error for {}: {}", url, e);
                    return FetchResult::Failure(FetchFailure::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            if (200..300).contains(&response.status) {
                tracing::info!("Successful response received from {}", url);
                return FetchResult::Success(FetchedPage {
                    url: url.to_string(),
                    status: response.status,
                    body: response.body,
                    attempts: attempt,
                });
            }

            if attempt >= max_attempts {
                tracing::error!(
                    "Response status repeatedly {} for {} ({} attempts)",
                    response.status,
                    url,
                    attempt
                );
                return FetchResult::Failure(FetchFailure::HttpStatus {
                    url: url.to_string(),
                    status: response.status,
                    attempts: attempt,
                });
            }

            tracing::warn!(
                "Status code {} for {} (attempt {}/{}), retrying",
                response.status,
                url,
                attempt,
                max_attempts
            );

            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
            attempt += 1;
        }
    }
}
