//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop for one site:
//! - Seeding and draining the frontier
//! - Dispatching fetch-and-parse work to a bounded pool of tasks
//! - Classifying discovered links and feeding internal ones back
//! - Aggregating links and map findings into the final site map

use crate::config::Config;
use crate::crawler::fetcher::{FetchPort, HttpFetcher, Renderer};
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::retry::{JitterSource, RetryPolicy};
use crate::links::{LinkClassifier, LinkType, RuleSet};
use crate::maps::MapsAggregator;
use crate::page::{PageAnalyzer, PageOutcome, PageRecord};
use crate::sitemap::{SiteMap, SiteMapAggregator};
use crate::url::{normalize_url, site_domain};
use crate::{FetchError, Result, UrlError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Lifecycle of one site crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Nothing dispatched yet
    Init,
    /// Fetching and admitting new URLs
    Running,
    /// Budget reached or deadline passed: no new admissions, in-flight work finishes
    Draining,
    /// No queued and no in-flight work remains
    Done,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A URL that was skipped after its fetch failed for good
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub url: Url,
    pub depth: u32,
    pub error: FetchError,
}

/// Everything one site crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub site_map: SiteMap,
    pub pages: Vec<PageRecord>,
    pub failures: Vec<CrawlFailure>,
}

type WorkerResult = (CrawlTask, std::result::Result<PageOutcome, FetchError>);

/// Main crawler structure
///
/// A crawler holds the configuration and the collaborators shared by every
/// site it crawls. Each call to [`crawl`](Self::crawl) owns a fresh
/// [`Frontier`], so crawls never share discovered URLs.
pub struct Crawler {
    config: Arc<Config>,
    rules: Arc<RuleSet>,
    fetcher: Arc<dyn FetchPort>,
    renderer: Option<Arc<dyn Renderer>>,
    jitter: Option<Arc<dyn JitterSource>>,
    deadline: Option<Duration>,
}

impl Crawler {
    /// Creates a crawler with the reqwest fetch port
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(AtlasError)` - A rule pattern or the HTTP client failed to build
    pub fn new(config: &Config) -> Result<Self> {
        let rules = Arc::new(RuleSet::from_config(&config.rules)?);
        let fetcher: Arc<dyn FetchPort> = Arc::new(HttpFetcher::new(config)?);
        let deadline = match config.crawler.deadline_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            config: Arc::new(config.clone()),
            rules,
            fetcher,
            renderer: None,
            jitter: None,
            deadline,
        })
    }

    /// Replaces the fetch port
    pub fn with_fetcher(mut self, fetcher: Arc<dyn FetchPort>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Routes short responses to a renderer instead of re-fetching them
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Limits the wall-clock time of each site crawl
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.rules),
            &self.config.crawler,
        );
        if let Some(renderer) = &self.renderer {
            policy = policy.with_renderer(Arc::clone(renderer));
        }
        if let Some(jitter) = &self.jitter {
            policy = policy.with_jitter(Arc::clone(jitter));
        }
        policy
    }

    /// Crawls one site breadth-first starting at `main_url`
    ///
    /// Per-URL fetch failures never abort the crawl; they are logged and
    /// collected in [`CrawlOutcome::failures`].
    ///
    /// # Arguments
    ///
    /// * `main_url` - The site's entry URL (depth 0)
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The finalized site map and fetched pages
    /// * `Err(AtlasError)` - `main_url` is not a crawlable URL
    pub async fn crawl(&self, main_url: &str) -> Result<CrawlOutcome> {
        let seed = normalize_url(main_url)?;
        let domain = site_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let classifier = LinkClassifier::new(&seed, Arc::clone(&self.rules))?;

        let crawler_config = &self.config.crawler;
        let frontier = Frontier::new(
            crawler_config.max_pages_per_site,
            crawler_config.max_crawl_depth,
        );
        let max_workers = crawler_config.max_workers.max(1) as usize;

        let policy = Arc::new(self.retry_policy());
        let analyzer = Arc::new(PageAnalyzer::new(Arc::clone(&self.rules)));

        let mut site_map = SiteMapAggregator::new(domain.clone(), seed.as_str());
        let mut maps = MapsAggregator::new();
        let mut pages: Vec<PageRecord> = Vec::new();
        let mut failures: Vec<CrawlFailure> = Vec::new();

        let started = Instant::now();
        let deadline = self.deadline.map(|d| started + d);
        let mut deadline_passed = false;
        let mut phase = CrawlPhase::Init;

        info!("Crawling {} ({})", seed, domain);
        frontier.enqueue(seed.clone(), 0);

        let mut workers: JoinSet<WorkerResult> = JoinSet::new();
        phase = transition(phase, CrawlPhase::Running, &domain);

        loop {
            while workers.len() < max_workers {
                let Some(task) = frontier.dequeue() else {
                    break;
                };
                debug!("Dispatching {} (depth {})", task.url, task.depth);
                workers.spawn(fetch_and_analyze(
                    task,
                    Arc::clone(&policy),
                    Arc::clone(&analyzer),
                ));
            }

            if workers.is_empty() {
                break;
            }

            let joined = tokio::select! {
                joined = workers.join_next() => joined,
                _ = wait_for(deadline), if !deadline_passed => {
                    deadline_passed = true;
                    let dropped = frontier.clear();
                    frontier.close();
                    warn!(
                        "Deadline reached for {}: dropped {} queued URL(s), waiting for {} in flight",
                        domain,
                        dropped,
                        workers.len()
                    );
                    phase = transition(phase, CrawlPhase::Draining, &domain);
                    continue;
                }
            };

            let (task, result) = match joined {
                Some(Ok(done)) => done,
                Some(Err(e)) => {
                    error!("Worker task failed: {}", e);
                    continue;
                }
                None => break,
            };

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Skipping {} after fetch failure: {}", task.url, e);
                    failures.push(CrawlFailure {
                        url: task.url,
                        depth: task.depth,
                        error: e,
                    });
                    continue;
                }
            };

            let PageOutcome { record, links } = outcome;
            site_map.record_page(record.depth);
            maps.record_page(&record.maps_found, record.is_contact_page);

            let mut admitted = 0;
            for candidate in links {
                let link = classifier.classify(candidate);
                if link.link_type == LinkType::Internal
                    && phase == CrawlPhase::Running
                    && frontier.enqueue(link.url.clone(), link.depth + 1)
                {
                    admitted += 1;
                }
                site_map.record(link);
            }
            debug!(
                "Processed {} (depth {}): {} new URL(s) admitted",
                record.url, record.depth, admitted
            );
            pages.push(record);

            if pages.len() % 10 == 0 {
                let elapsed = started.elapsed();
                let rate = pages.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                info!(
                    "Progress: {} pages fetched, {} queued, {} in flight, {:.2} pages/sec",
                    pages.len(),
                    frontier.len(),
                    workers.len(),
                    rate
                );
            }

            if phase == CrawlPhase::Running && frontier.is_budget_reached() {
                frontier.close();
                info!(
                    "Page budget of {} reached for {}; finishing {} queued URL(s)",
                    crawler_config.max_pages_per_site,
                    domain,
                    frontier.len()
                );
                phase = transition(phase, CrawlPhase::Draining, &domain);
            }
        }

        transition(phase, CrawlPhase::Done, &domain);

        let total_pages = frontier.discovered_count();
        let maps_info = maps.finish();
        let site_map = site_map.finalize(total_pages, maps_info);

        info!(
            "Finished {} in {:?}: {} pages fetched, {} skipped, {} links, complexity {}, maps {}",
            domain,
            started.elapsed(),
            pages.len(),
            failures.len(),
            site_map.total_links,
            site_map.complexity,
            site_map.maps_info.integration_status
        );

        Ok(CrawlOutcome {
            site_map,
            pages,
            failures,
        })
    }
}

fn transition(from: CrawlPhase, to: CrawlPhase, domain: &str) -> CrawlPhase {
    if from != to {
        debug!("Crawl of {}: {} -> {}", domain, from, to);
    }
    to
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Worker body: fetch with retries, then parse and analyze the page
async fn fetch_and_analyze(
    task: CrawlTask,
    policy: Arc<RetryPolicy>,
    analyzer: Arc<PageAnalyzer>,
) -> WorkerResult {
    let result = match policy.fetch(&task.url).await {
        Ok(fetched) => {
            if fetched.attempts > 1 || fetched.rendered {
                debug!(
                    "Fetched {} after {} attempt(s){}",
                    task.url,
                    fetched.attempts,
                    if fetched.rendered { " via renderer" } else { "" }
                );
            }
            let response = fetched.response;
            Ok(analyzer.analyze(
                response.final_url,
                task.depth,
                response.status,
                response.content,
                fetched.latency,
            ))
        }
        Err(e) => Err(e),
    };
    (task, result)
}
