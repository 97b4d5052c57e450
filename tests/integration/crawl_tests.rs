//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_atlas::config::{Config, CrawlerConfig, OutputConfig, RulesConfig, UserAgentConfig};
use site_atlas::crawler::Crawler;
use site_atlas::output::write_site_outputs;
use site_atlas::storage::{open_storage, RunStatus, Storage};
use site_atlas::{Complexity, IntegrationStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast retries and a low content threshold
fn create_test_config(output_dir: &std::path::Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_workers: 4,
            min_html_length: 10,
            backoff_base_ms: 1,
            request_timeout_secs: 5,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            name: "TestAtlas/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: output_dir.join("atlas.db").display().to_string(),
            summary_dir: output_dir.join("analyzed").display().to_string(),
        },
        rules: RulesConfig::default(),
    }
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a small five-page business site
///
/// ```text
/// /            -> /about, /reach-us (nav), /services (footer), partner, facebook
/// /about       -> /, /services
/// /reach-us    -> map place link, map embed
/// /services    -> /services/widgets
/// ```
async fn mount_business_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Acme Home</title>
        <meta name="description" content="Acme widgets"></head><body>
        <nav><a href="/about">About us</a><a href="/reach-us">Reach us</a></nav>
        <p>Welcome to Acme widgets.</p>
        <a href="https://partner.org/deal">Partner</a>
        <a href="https://www.facebook.com/acme">Facebook</a>
        <footer><a href="/services">Services</a></footer>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/about",
        r#"<html><head><title>Our story</title></head><body>
        <p>Family owned since 1999.</p>
        <a href="/">Home</a><a href="/services">Services</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/reach-us",
        r#"<html><head><title>Visit</title></head><body>
        <p>Find us at our shop. Contact the team any weekday.</p>
        <a href="https://maps.google.com/maps/place/Acme+Shop">Directions</a>
        <iframe src="https://www.google.com/maps/embed?pb=acme"></iframe>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/services",
        r#"<html><head><title>Services</title></head><body>
        <a href="/services/widgets">Widgets</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/services/widgets",
        r#"<html><head><title>Widgets</title></head><body><p>Blue widgets.</p></body></html>"#,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    mount_business_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::new(&create_test_config(dir.path())).unwrap();
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();
    let site_map = &outcome.site_map;

    assert_eq!(outcome.pages.len(), 5);
    assert!(outcome.failures.is_empty());
    assert_eq!(site_map.total_pages, 5);
    assert_eq!(site_map.crawl_depth_reached, 2);
    assert_eq!(site_map.complexity, Complexity::Basic);

    assert_eq!(site_map.total_links, 9);
    assert_eq!(site_map.internal_links.len(), 6);
    assert_eq!(site_map.external_links.len(), 1);
    assert_eq!(site_map.social_links.len(), 1);
    assert_eq!(site_map.maps_links.len(), 1);

    let reach_us = site_map
        .internal_links
        .iter()
        .find(|l| l.url.path() == "/reach-us")
        .unwrap();
    assert!(reach_us.is_navigation);
    assert!(reach_us.is_contact);

    let services = site_map
        .internal_links
        .iter()
        .find(|l| l.url.path() == "/services" && l.depth == 0)
        .unwrap();
    assert!(services.is_footer);
}

#[tokio::test]
async fn test_maps_reconciled_across_pages() {
    let server = MockServer::start().await;
    mount_business_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::new(&create_test_config(dir.path())).unwrap();
    let outcome = crawler.crawl(&server.uri()).await.unwrap();
    let maps = &outcome.site_map.maps_info;

    assert_eq!(maps.integration_status, IntegrationStatus::Integrated);
    assert_eq!(maps.direct.len(), 1);
    assert_eq!(maps.iframe, vec!["https://www.google.com/maps/embed?pb=acme"]);
    assert_eq!(maps.total_found, 2);
    assert_eq!(maps.contact_page.len(), 2);
    assert!(maps
        .primary_link
        .as_deref()
        .unwrap()
        .contains("/maps/place/Acme"));

    let reach_us = outcome
        .pages
        .iter()
        .find(|p| p.url.path() == "/reach-us")
        .unwrap();
    assert!(reach_us.is_contact_page);
    assert_eq!(reach_us.maps_found.total(), 2);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    mount_business_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.max_crawl_depth = 1;

    let outcome = Crawler::new(&config)
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert_eq!(outcome.site_map.total_pages, 4);
    assert_eq!(outcome.site_map.crawl_depth_reached, 1);
    assert!(outcome
        .pages
        .iter()
        .all(|p| p.url.path() != "/services/widgets"));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let server = MockServer::start().await;
    mount_business_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.max_pages_per_site = 2;

    let outcome = Crawler::new(&config)
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert_eq!(outcome.site_map.total_pages, 2);
    assert_eq!(outcome.pages.len(), 2);
}

#[tokio::test]
async fn test_transient_error_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        "<html><body><p>Back online.</p></body></html>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let outcome = Crawler::new(&create_test_config(dir.path()))
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert!(outcome.failures.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blocked_page_skipped_after_retries() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Just a moment...</title></head><body>Checking your browser</body></html>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let outcome = Crawler::new(&create_test_config(dir.path()))
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.site_map.total_pages, 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_challenge_served_as_forbidden_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<html><head><title>Just a moment...</title></head><body>Checking your browser</body></html>",
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        "<html><body><p>Welcome back.</p></body></html>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let outcome = Crawler::new(&create_test_config(dir.path()))
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert!(outcome.failures.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_page_not_retried() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/gone">Old page</a></body></html>"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let outcome = Crawler::new(&create_test_config(dir.path()))
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].url.path(), "/gone");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_crawl_persisted_and_exported() {
    let server = MockServer::start().await;
    mount_business_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let outcome = Crawler::new(&config)
        .unwrap()
        .crawl(&server.uri())
        .await
        .unwrap();

    let mut storage = open_storage(std::path::Path::new(&config.output.database_path)).unwrap();
    let run_id = storage.create_run("test-hash").unwrap();
    let site_id = storage.save_site(run_id, &outcome).unwrap();
    storage.finish_run(run_id, RunStatus::Completed).unwrap();

    let site = storage.get_site(site_id).unwrap();
    assert_eq!(site.total_pages, 5);
    assert_eq!(site.maps_status, "Integrated");
    assert_eq!(storage.count_pages(site_id).unwrap(), 5);

    let counts = storage.count_links_by_type(site_id).unwrap();
    assert_eq!(counts.get("internal"), Some(&6));
    assert_eq!(counts.get("maps"), Some(&1));

    // direct + iframe, each also recorded under the contact-page channel
    assert_eq!(storage.get_map_links(site_id).unwrap().len(), 4);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);

    let paths =
        write_site_outputs(&outcome, std::path::Path::new(&config.output.summary_dir)).unwrap();
    assert!(paths.sitemap_json.exists());
    assert_eq!(paths.page_files.len(), 5);

    let summary = std::fs::read_to_string(&paths.summary_markdown).unwrap();
    assert!(summary.contains("- **Integration Status**: Integrated"));
    assert!(summary.contains("| Social | 1 |"));
}
