//! Output module for exporting crawl results
//!
//! This module handles:
//! - Generating the markdown sitemap summary of a site
//! - Exporting the site map and per-page metadata as JSON
//!
//! Every site gets its own directory under the configured summary directory:
//!
//! ```text
//! <summary-dir>/<domain>/
//!     <domain>_complete_sitemap.json
//!     <domain>_sitemap_summary.md
//!     pages/<domain>_<path>_<index>.json
//! ```

mod json;
mod markdown;

pub use json::{page_file_name, write_page_json, write_sitemap_json};
pub use markdown::{format_markdown_summary, generate_markdown_summary};

use crate::crawler::CrawlOutcome;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Files written for one site
#[derive(Debug, Clone)]
pub struct SiteOutputPaths {
    pub directory: PathBuf,
    pub sitemap_json: PathBuf,
    pub summary_markdown: PathBuf,
    pub page_files: Vec<PathBuf>,
}

/// Writes every export of one crawled site
///
/// # Arguments
///
/// * `outcome` - The finished crawl of the site
/// * `summary_dir` - Root directory for all site exports
///
/// # Returns
///
/// * `Ok(SiteOutputPaths)` - Paths of the files written
/// * `Err(OutputError)` - Failed to create a directory or write a file
pub fn write_site_outputs(outcome: &CrawlOutcome, summary_dir: &Path) -> OutputResult<SiteOutputPaths> {
    let domain = &outcome.site_map.domain;
    let stem = json::sanitize(domain);
    let directory = summary_dir.join(&stem);
    let pages_dir = directory.join("pages");
    std::fs::create_dir_all(&pages_dir)?;

    let sitemap_json = directory.join(format!("{}_complete_sitemap.json", stem));
    write_sitemap_json(&outcome.site_map, &sitemap_json)?;

    let summary_markdown = directory.join(format!("{}_sitemap_summary.md", stem));
    generate_markdown_summary(&outcome.site_map, &summary_markdown)?;

    let mut page_files = Vec::with_capacity(outcome.pages.len());
    for (index, page) in outcome.pages.iter().enumerate() {
        let path = pages_dir.join(format!("{}.json", page_file_name(domain, page, index)));
        write_page_json(page, &path)?;
        debug!("Wrote page metadata {}", path.display());
        page_files.push(path);
    }

    info!(
        "Wrote exports for {} to {} ({} pages)",
        domain,
        directory.display(),
        page_files.len()
    );

    Ok(SiteOutputPaths {
        directory,
        sitemap_json,
        summary_markdown,
        page_files,
    })
}
