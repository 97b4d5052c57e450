use crate::links::{extract_links, LinkCandidate, RuleSet};
use crate::maps::MapsDetector;
use crate::page::{PageRecord, PageType};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Phrases in page text that mark an about page
const ABOUT_CONTENT_INDICATORS: [&str; 5] = [
    "about us",
    "our story",
    "our company",
    "who we are",
    "our mission",
];

/// Elements whose text is not visible page content
const INVISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Result of analyzing one page
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub record: PageRecord,
    pub links: Vec<LinkCandidate>,
}

/// Builds page records and link candidates from fetched content
///
/// Analysis is synchronous because a parsed document cannot cross an await
/// point; callers run it between fetches.
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    rules: Arc<RuleSet>,
    detector: MapsDetector,
}

impl PageAnalyzer {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            detector: MapsDetector::new(Arc::clone(&rules)),
            rules,
        }
    }

    /// Parses the content once and derives the record and the page's links
    ///
    /// # Arguments
    ///
    /// * `url` - Final URL of the page (after redirects)
    /// * `depth` - Crawl depth of the page
    /// * `status` - HTTP status of the response
    /// * `content` - Page content
    /// * `latency` - Time spent fetching, retries included
    pub fn analyze(
        &self,
        url: Url,
        depth: u32,
        status: u16,
        content: String,
        latency: Duration,
    ) -> PageOutcome {
        let document = Html::parse_document(&content);

        let structured_data = structured_data(&document, &url);
        let maps_found = self.detector.scan(&document, &url, &structured_data);
        let links = extract_links(&document, &url, depth, &self.rules);

        let text = visible_text(&document);
        let lowered_text = text.to_lowercase();
        let url_str = url.as_str().to_lowercase();

        let is_contact_page = url_str.contains("contact") || lowered_text.contains("contact");
        let is_about_page = self.rules.mentions_about(&url_str, "")
            || ABOUT_CONTENT_INDICATORS
                .iter()
                .any(|phrase| lowered_text.contains(phrase));

        let record = PageRecord {
            status,
            fetch_latency_ms: latency.as_millis() as u64,
            depth,
            title: title(&document),
            description: meta_description(&document),
            word_count: text.split_whitespace().count(),
            meta_tags: meta_tags(&document),
            structured_data,
            page_type: PageType::from_url(&url_str),
            is_about_page,
            is_contact_page,
            maps_found,
            fetched_at: Utc::now(),
            url,
            content,
        };

        PageOutcome { record, links }
    }
}

fn title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&selector)
        .find(|m| {
            m.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("description"))
        })
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Every meta element as its attribute map
fn meta_tags(document: &Html) -> Vec<BTreeMap<String, String>> {
    let Ok(selector) = Selector::parse("meta") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|m| {
            m.value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        })
        .filter(|attrs| !attrs.is_empty())
        .collect()
}

/// Decodes every JSON-LD block, skipping malformed ones
fn structured_data(document: &Html, url: &Url) -> Vec<Value> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|script| {
            let raw: String = script.text().collect();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Skipping malformed structured data on {}: {}", url, e);
                    None
                }
            }
        })
        .collect()
}

/// Text of the body, excluding script and style content
fn visible_text(document: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| INVISIBLE_TAGS.contains(&a.value().name()));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::MenuType;

    fn analyzer() -> PageAnalyzer {
        PageAnalyzer::new(Arc::new(RuleSet::standard().unwrap()))
    }

    fn analyze(url: &str, html: &str) -> PageOutcome {
        analyzer().analyze(
            Url::parse(url).unwrap(),
            1,
            200,
            html.to_string(),
            Duration::from_millis(120),
        )
    }

    const PAGE: &str = r#"<html>
        <head>
            <title> Acme Widgets </title>
            <meta charset="utf-8">
            <meta name="Description" content="Widgets since 1990">
            <script type="application/ld+json">
                {"@type": "LocalBusiness", "geo": {"latitude": 40.0, "longitude": -73.9}}
            </script>
            <script type="application/ld+json">{ not json </script>
            <style>.hidden { display: none }</style>
        </head>
        <body>
            <nav><a href="/contact">Contact</a></nav>
            <p>Learn our story and get in touch.</p>
            <script>var ignored = "words here";</script>
        </body>
    </html>"#;

    #[test]
    fn test_analyze_metadata() {
        let outcome = analyze("https://example.com/widgets", PAGE);
        let record = &outcome.record;

        assert_eq!(record.title.as_deref(), Some("Acme Widgets"));
        assert_eq!(record.description.as_deref(), Some("Widgets since 1990"));
        assert_eq!(record.meta_tags.len(), 2);
        assert_eq!(record.status, 200);
        assert_eq!(record.depth, 1);
        assert_eq!(record.fetch_latency_ms, 120);
        assert_eq!(record.page_type, PageType::General);
    }

    #[test]
    fn test_malformed_structured_data_skipped() {
        let outcome = analyze("https://example.com/widgets", PAGE);

        assert_eq!(outcome.record.structured_data.len(), 1);
        assert_eq!(
            outcome.record.maps_found.structured_data,
            vec!["https://www.google.com/maps?q=40.0,-73.9".to_string()]
        );
    }

    #[test]
    fn test_visible_word_count() {
        let outcome = analyze("https://example.com/widgets", PAGE);
        // "Contact" + "Learn our story and get in touch."
        assert_eq!(outcome.record.word_count, 8);
    }

    #[test]
    fn test_page_flags() {
        let outcome = analyze("https://example.com/widgets", PAGE);
        assert!(outcome.record.is_contact_page);
        assert!(outcome.record.is_about_page);

        let outcome = analyze(
            "https://example.com/pricing",
            "<html><body><p>Plans and prices</p></body></html>",
        );
        assert!(!outcome.record.is_contact_page);
        assert!(!outcome.record.is_about_page);
    }

    #[test]
    fn test_links_extracted_at_page_depth() {
        let outcome = analyze("https://example.com/widgets", PAGE);

        assert_eq!(outcome.links.len(), 1);
        assert_eq!(outcome.links[0].url.as_str(), "https://example.com/contact");
        assert_eq!(outcome.links[0].depth, 1);
        assert_eq!(outcome.links[0].placement.menu_type, MenuType::Header);
    }
}
