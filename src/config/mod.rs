//! Configuration module for Site-Atlas
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional except `[crawler]`; omitted values fall back to the
//! defaults in [`defaults`].
//!
//! # Example
//!
//! ```no_run
//! use site_atlas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("atlas.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_crawl_depth);
//! ```

pub mod defaults;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RulesConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
