//! Site-Atlas main entry point
//!
//! This is the command-line interface for the Site-Atlas website cartographer.

use clap::Parser;
use site_atlas::config::{load_config_with_hash, Config};
use site_atlas::crawler::{CrawlOutcome, Crawler};
use site_atlas::output::write_site_outputs;
use site_atlas::storage::{open_storage, RunStatus, Storage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Site-Atlas: a website cartographer
///
/// Site-Atlas crawls each given website breadth-first, classifies every link
/// it finds, and reconciles the map references spread across the site into
/// one record. Results go to a SQLite database plus per-site JSON and
/// markdown exports.
#[derive(Parser, Debug)]
#[command(name = "site-atlas")]
#[command(version = "1.0.0")]
#[command(about = "A website cartographer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Entry URLs of the sites to crawl
    #[arg(value_name = "URL", required_unless_present = "dry_run")]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.urls);
        return Ok(());
    }

    handle_crawl(&config, &config_hash, &cli.urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_atlas=info,warn"),
            1 => EnvFilter::new("site_atlas=debug,info"),
            2 => EnvFilter::new("site_atlas=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Site-Atlas Dry Run ===\n");

    let crawler = &config.crawler;
    println!("Crawler Configuration:");
    println!("  Max workers: {}", crawler.max_workers);
    println!("  Max pages per site: {}", crawler.max_pages_per_site);
    println!("  Max crawl depth: {}", crawler.max_crawl_depth);
    println!("  Min HTML length: {}", crawler.min_html_length);
    println!("  Max retries: {}", crawler.max_retries);
    println!("  Backoff unit: {}ms", crawler.backoff_base_ms);
    println!("  Request timeout: {}s", crawler.request_timeout_secs);
    if crawler.deadline_secs == 0 {
        println!("  Deadline: none");
    } else {
        println!("  Deadline: {}s", crawler.deadline_secs);
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.name);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary directory: {}", config.output.summary_dir);

    let rules = &config.rules;
    println!("\nRules:");
    println!("  Excluded extensions: {}", rules.excluded_extensions.len());
    println!("  Social domains: {}", rules.social_domains.len());
    println!("  Contact keywords: {}", rules.contact_keywords.len());
    println!("  About keywords: {}", rules.about_keywords.len());
    println!("  Block signatures: {}", rules.block_signatures.len());

    println!("\nSites ({}):", urls.len());
    for url in urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation: one run, each site crawled in turn
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    urls: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = Crawler::new(config)?;
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(config_hash)?;
    tracing::info!("Started run {} with {} sites", run_id, urls.len());

    let summary_dir = Path::new(&config.output.summary_dir);
    let mut completed = 0usize;

    for url in urls {
        let started = Instant::now();
        let outcome = match crawler.crawl(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Skipping {}: {}", url, e);
                continue;
            }
        };

        let site_id = record_site(&mut storage, run_id, &outcome, summary_dir)?;

        let site_map = &outcome.site_map;
        tracing::info!(
            "Finished {} (site {}): {} pages, {} links, complexity {}, maps {} in {:.1}s",
            site_map.domain,
            site_id,
            site_map.total_pages,
            site_map.total_links,
            site_map.complexity,
            site_map.maps_info.integration_status,
            started.elapsed().as_secs_f64()
        );
        completed += 1;
    }

    let status = if completed == 0 && !urls.is_empty() {
        RunStatus::Failed
    } else {
        RunStatus::Completed
    };
    storage.finish_run(run_id, status)?;
    tracing::info!(
        "Run {} finished: {}/{} sites crawled",
        run_id,
        completed,
        urls.len()
    );

    Ok(())
}

/// Stores one crawled site and writes its exports
///
/// Either failure marks the run `failed` before the error is returned, so no
/// run is left `running`.
fn record_site(
    storage: &mut dyn Storage,
    run_id: i64,
    outcome: &CrawlOutcome,
    summary_dir: &Path,
) -> Result<i64, Box<dyn std::error::Error>> {
    let recorded: Result<i64, Box<dyn std::error::Error>> = storage
        .save_site(run_id, outcome)
        .map_err(Into::into)
        .and_then(|site_id| {
            write_site_outputs(outcome, summary_dir)?;
            Ok(site_id)
        });

    if let Err(e) = &recorded {
        tracing::error!(
            "Failed to record results for {}: {}",
            outcome.site_map.domain,
            e
        );
        storage.finish_run(run_id, RunStatus::Failed)?;
    }

    recorded
}
