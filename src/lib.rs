//! Site-Atlas: a website cartographer
//!
//! This crate crawls a single website breadth-first, classifies every outbound
//! link it finds by domain relationship and structural placement, and then
//! reconciles map/location references found across the fetched pages into one
//! consolidated record.

pub mod config;
pub mod crawler;
pub mod links;
pub mod maps;
pub mod output;
pub mod page;
pub mod sitemap;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Atlas operations
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Empty link target")]
    Empty,

    #[error("In-page fragment link: {0}")]
    InPage(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// HTTP status codes that are worth another attempt
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Failure kinds produced while fetching a single URL
///
/// These never abort a crawl. The retry policy decides which ones get another
/// attempt; everything else (and everything after the last attempt) turns into
/// a logged, permanent skip of that one URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("HTTP {0}")]
    HttpError(u16),

    #[error("Content blocked ({0})")]
    ContentBlocked(String),

    #[error("Content too short ({0} bytes)")]
    ContentTooShort(usize),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl FetchError {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailure(_) => true,
            Self::HttpError(status) => RETRYABLE_STATUS_CODES.contains(status),
            Self::ContentBlocked(_) | Self::ContentTooShort(_) => true,
            Self::ParseError(_) => false,
        }
    }
}

/// Result type alias for Site-Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Crawler};
pub use links::{DiscoveredLink, LinkType, MenuType};
pub use maps::{IntegrationStatus, MapsInfo};
pub use page::PageRecord;
pub use sitemap::{Complexity, SiteMap};
