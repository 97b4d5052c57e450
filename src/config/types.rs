use crate::config::defaults;
use serde::Deserialize;

/// Main configuration structure for Site-Atlas
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Size of the fetch worker pool
    #[serde(default = "default_max_workers")]
    pub max_workers: u32,

    /// Maximum number of distinct URLs admitted to the frontier per site
    #[serde(default = "default_max_pages")]
    pub max_pages_per_site: usize,

    /// Deepest level a URL may be admitted at (the seed is depth 0)
    #[serde(default = "default_max_depth")]
    pub max_crawl_depth: u32,

    /// Responses shorter than this many bytes are treated as suspect
    #[serde(default = "default_min_html_length")]
    pub min_html_length: usize,

    /// Maximum number of fetch attempts per URL
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds; attempt `i` waits `(2^i + jitter)` units
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Wall-clock limit for one site in seconds (0 disables it)
    #[serde(default)]
    pub deadline_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_workers: defaults::MAX_WORKERS,
            max_pages_per_site: defaults::MAX_PAGES_PER_SITE,
            max_crawl_depth: defaults::MAX_CRAWL_DEPTH,
            min_html_length: defaults::MIN_HTML_LENGTH,
            max_retries: defaults::MAX_RETRIES,
            backoff_base_ms: defaults::BACKOFF_BASE_MS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            deadline_secs: 0,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub name: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory receiving per-domain sitemap summaries and JSON exports
    #[serde(default = "default_summary_dir")]
    pub summary_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            summary_dir: default_summary_dir(),
        }
    }
}

/// Heuristic keyword and domain tables used by link classification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RulesConfig {
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,

    /// Social network domains; entries may use a leading `*.` wildcard
    #[serde(default = "default_social_domains")]
    pub social_domains: Vec<String>,

    #[serde(default = "default_contact_keywords")]
    pub contact_keywords: Vec<String>,

    #[serde(default = "default_about_keywords")]
    pub about_keywords: Vec<String>,

    #[serde(default = "default_block_signatures")]
    pub block_signatures: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            excluded_extensions: default_excluded_extensions(),
            social_domains: default_social_domains(),
            contact_keywords: default_contact_keywords(),
            about_keywords: default_about_keywords(),
            block_signatures: default_block_signatures(),
        }
    }
}

fn default_max_workers() -> u32 {
    defaults::MAX_WORKERS
}

fn default_max_pages() -> usize {
    defaults::MAX_PAGES_PER_SITE
}

fn default_max_depth() -> u32 {
    defaults::MAX_CRAWL_DEPTH
}

fn default_min_html_length() -> usize {
    defaults::MIN_HTML_LENGTH
}

fn default_max_retries() -> u32 {
    defaults::MAX_RETRIES
}

fn default_backoff_base_ms() -> u64 {
    defaults::BACKOFF_BASE_MS
}

fn default_request_timeout() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    defaults::USER_AGENT.to_string()
}

fn default_database_path() -> String {
    defaults::DATABASE_PATH.to_string()
}

fn default_summary_dir() -> String {
    defaults::SUMMARY_DIR.to_string()
}

fn default_excluded_extensions() -> Vec<String> {
    defaults::strings(defaults::EXCLUDED_EXTENSIONS)
}

fn default_social_domains() -> Vec<String> {
    defaults::strings(defaults::SOCIAL_DOMAINS)
}

fn default_contact_keywords() -> Vec<String> {
    defaults::strings(defaults::CONTACT_KEYWORDS)
}

fn default_about_keywords() -> Vec<String> {
    defaults::strings(defaults::ABOUT_KEYWORDS)
}

fn default_block_signatures() -> Vec<String> {
    defaults::strings(defaults::BLOCK_SIGNATURES)
}
