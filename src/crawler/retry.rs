//! Retry and backoff policy around the fetch port
//!
//! Every response is classified before it is accepted:
//!
//! | Condition | Error | Retried |
//! |-----------|-------|---------|
//! | Body contains a block/challenge signature (any status) | `ContentBlocked` | yes |
//! | Status 429, 500, 502, 503, 504 | `HttpError` | yes |
//! | Any other non-2xx status | `HttpError` | no |
//! | Body shorter than the minimum length | `ContentTooShort` | yes, or rendered |
//! | Timeout / connection failure | `Timeout` / `ConnectionFailure` | yes |
//!
//! Attempt `i` (0-based) that fails with a retryable error waits
//! `(2^i + jitter)` backoff units before the next attempt.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchPort, FetchResponse, Renderer};
use crate::links::RuleSet;
use crate::FetchError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};
use url::Url;

/// Source of backoff jitter in `[0, 1)`
pub trait JitterSource: Send + Sync {
    fn jitter(&self) -> f64;
}

/// Uniform jitter from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn jitter(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Constant jitter, for reproducible timing
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn jitter(&self) -> f64 {
        self.0
    }
}

/// A response that passed classification
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub response: FetchResponse,
    /// Wall time from the first attempt until acceptance, backoff included
    pub latency: Duration,
    pub attempts: u32,
    /// Whether the content came from the renderer
    pub rendered: bool,
}

/// Wraps a fetch port with failure classification and backoff
pub struct RetryPolicy {
    fetcher: Arc<dyn FetchPort>,
    renderer: Option<Arc<dyn Renderer>>,
    jitter: Arc<dyn JitterSource>,
    rules: Arc<RuleSet>,
    max_attempts: u32,
    backoff_unit: Duration,
    min_html_length: usize,
}

impl RetryPolicy {
    pub fn new(fetcher: Arc<dyn FetchPort>, rules: Arc<RuleSet>, config: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            renderer: None,
            jitter: Arc::new(ThreadRngJitter),
            rules,
            max_attempts: config.max_retries.max(1),
            backoff_unit: Duration::from_millis(config.backoff_base_ms),
            min_html_length: config.min_html_length,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay after failed attempt `attempt` (0-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let jitter = self.jitter.jitter().clamp(0.0, 1.0);
        let factor = 2f64.powi(attempt.min(30) as i32) + jitter;
        self.backoff_unit.mul_f64(factor)
    }

    /// Checks a response against the signature, status, and length rules
    ///
    /// Block signatures are checked whatever the status, so a challenge page
    /// served as 403 is retried like one served as 200.
    pub fn classify(&self, response: &FetchResponse) -> Result<(), FetchError> {
        if let Some(signature) = self.rules.block_signature(&response.content) {
            return Err(FetchError::ContentBlocked(signature.to_string()));
        }

        if !(200..300).contains(&response.status) {
            return Err(FetchError::HttpError(response.status));
        }

        if response.content.len() < self.min_html_length {
            return Err(FetchError::ContentTooShort(response.content.len()));
        }

        Ok(())
    }

    /// Fetches a URL, retrying retryable failures up to the attempt limit
    ///
    /// Non-retryable failures are returned at once. After the last attempt
    /// the last error is returned and no further delay is taken.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();
        let mut last_error = FetchError::Timeout;

        for attempt in 0..self.max_attempts {
            match self.attempt(url).await {
                Ok((response, rendered)) => {
                    return Ok(FetchedPage {
                        response,
                        latency: started.elapsed(),
                        attempts: attempt + 1,
                        rendered,
                    });
                }
                Err(e) if !e.is_retryable() => {
                    debug!("Not retrying {}: {}", url, e);
                    return Err(e);
                }
                Err(e) => {
                    if attempt + 1 < self.max_attempts {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                            attempt + 1,
                            self.max_attempts,
                            url,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    } else {
                        warn!(
                            "Attempt {}/{} for {} failed: {}",
                            attempt + 1,
                            self.max_attempts,
                            url,
                            e
                        );
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, url: &Url) -> Result<(FetchResponse, bool), FetchError> {
        let response = self.fetcher.fetch(url).await?;

        match (self.classify(&response), &self.renderer) {
            (Ok(()), _) => Ok((response, false)),
            (Err(FetchError::ContentTooShort(len)), Some(renderer)) => {
                debug!("Rendering {} ({} bytes fetched)", url, len);
                let content = renderer.render(url).await?;

                if let Some(signature) = self.rules.block_signature(&content) {
                    return Err(FetchError::ContentBlocked(signature.to_string()));
                }
                if content.trim().is_empty() {
                    return Err(FetchError::ContentTooShort(0));
                }

                Ok((FetchResponse { content, ..response }, true))
            }
            (Err(e), _) => Err(e),
        }
    }
}
