//! HTTP fetcher implementation
//!
//! This module defines the fetch port the crawler depends on and its reqwest
//! implementation:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests following redirects
//! - Mapping transport failures onto [`FetchError`] kinds
//!
//! A [`Renderer`] is an optional second port used when a response looks too
//! short to be the real page (for example a script-rendered shell).

use crate::config::{Config, UserAgentConfig};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A response from the fetch port, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub content: String,
}

/// Resolves a URL to page content and status
///
/// Implementations return `Ok` for every response that arrived, including
/// error statuses; status interpretation belongs to the retry policy.
#[async_trait]
pub trait FetchPort: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Produces rendered page content for URLs whose plain response was too short
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_atlas::config::UserAgentConfig;
/// use site_atlas::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     name: "SiteAtlas/1.0".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(50)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.name.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetch port backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        Ok(Self {
            client: build_http_client(&config.user_agent, timeout)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchPort for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content = response.text().await.map_err(classify_transport_error)?;

        Ok(FetchResponse {
            final_url,
            status,
            content,
        })
    }
}

/// Maps a reqwest failure onto a fetch error kind
fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::ParseError(e.to_string())
    } else {
        FetchError::ConnectionFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            name: "TestAtlas/1.0".to_string(),
        }
    }

    fn fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::with_client(build_http_client(&create_test_config(), timeout).unwrap())
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let response = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content, "<html>hello</html>");
        assert_eq!(response.final_url, url);
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/x", server.uri())).unwrap();
        let response = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_redirect_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let response = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();
        assert_eq!(response.final_url.path(), "/new");
        assert_eq!(response.content, "moved");
    }

    #[tokio::test]
    async fn test_timeout_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let result = fetcher(Duration::from_millis(200)).fetch(&url).await;
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused_classified() {
        // Bind then drop a listener to get a port nobody is serving
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let result = fetcher(Duration::from_secs(5)).fetch(&url).await;
        assert!(matches!(result, Err(FetchError::ConnectionFailure(_))));
    }
}
