//! Crawler module for listing-page fetching and product extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retry and randomized headers
//! - Pagination discovery on the root page
//! - Per-page product field extraction
//! - A fixed-size worker pool and the run coordinator

mod batch;
mod coordinator;
mod extractor;
mod fetcher;
mod headers;
mod pagination;
mod record;
mod scheduler;

pub use batch::{BatchCollector, ResultBatch};
pub use coordinator::{Coordinator, CrawlReport};
pub use extractor::{
    decode_unicode_escape, extract_all, extract_product, PRODUCT_BLOCK_SELECTOR,
};
pub use fetcher::{
    build_http_client, FetchFailure, FetchResult, FetchedPage, Fetcher, RawResponse,
    ReqwestTransport, Transport, TransportError,
};
pub use headers::{HeaderGenerator, RandomHeaders};
pub use pagination::{discover, PAGINATION_SELECTOR};
pub use record::{format_timestamp, parse_timestamp, ProductRecord, TIMESTAMP_FORMAT};
pub use scheduler::{process_page, Dispatch, PageOutcome, Scheduler};
