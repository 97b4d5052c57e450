//! Crawler module for breadth-first site traversal
//!
//! This module contains the core crawling logic, including:
//! - The frontier (deduplicating FIFO queue with depth and page bounds)
//! - The fetch port and its reqwest implementation
//! - Retry and backoff around fetching
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod retry;

pub use coordinator::{CrawlFailure, CrawlOutcome, CrawlPhase, Crawler};
pub use fetcher::{build_http_client, FetchPort, FetchResponse, HttpFetcher, Renderer};
pub use frontier::{CrawlTask, Frontier};
pub use retry::{FetchedPage, FixedJitter, JitterSource, RetryPolicy, ThreadRngJitter};
