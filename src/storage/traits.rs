//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::CrawlOutcome;
use crate::storage::{RunRecord, RunStatus, SiteRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Site not found: {0}")]
    SiteNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A run groups the sites crawled by one invocation. Each site's outcome is
/// written once, after its crawl has finished.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Updates the status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Site Results =====

    /// Persists one site's crawl outcome
    ///
    /// The site map, its pages, links, map links and failures are written in
    /// a single transaction.
    ///
    /// # Returns
    ///
    /// The ID of the new site row
    fn save_site(&mut self, run_id: i64, outcome: &CrawlOutcome) -> StorageResult<i64>;

    /// Gets a site by ID
    fn get_site(&self, site_id: i64) -> StorageResult<SiteRecord>;

    /// Gets every site stored for a run
    fn get_sites_for_run(&self, run_id: i64) -> StorageResult<Vec<SiteRecord>>;

    // ===== Statistics =====

    /// Counts stored pages of a site
    fn count_pages(&self, site_id: i64) -> StorageResult<u64>;

    /// Counts stored links of a site by link type
    fn count_links_by_type(&self, site_id: i64) -> StorageResult<HashMap<String, u64>>;

    /// Gets `(channel, url)` pairs of a site's map links
    fn get_map_links(&self, site_id: i64) -> StorageResult<Vec<(String, String)>>;
}
