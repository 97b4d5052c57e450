use crate::links::RuleSet;
use crate::maps::PageMapFindings;
use crate::url::normalize_link;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;
use url::Url;

const ADDRESS_FIELDS: [&str; 4] = [
    "streetAddress",
    "addressLocality",
    "addressRegion",
    "postalCode",
];

/// Scans a single page over every map-detection channel
#[derive(Debug, Clone)]
pub struct MapsDetector {
    rules: Arc<RuleSet>,
}

impl MapsDetector {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Collects map URLs from one page
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed page
    /// * `page_url` - URL of the page, used to resolve relative anchors
    /// * `structured_data` - Decoded structured-data blocks of the page
    pub fn scan(&self, document: &Html, page_url: &Url, structured_data: &[Value]) -> PageMapFindings {
        let findings = PageMapFindings {
            direct: self.direct_links(document, page_url),
            iframe: self.iframe_links(document),
            script: self.script_links(document),
            structured_data: structured_data
                .iter()
                .fold(Vec::new(), |mut acc, block| {
                    for link in structured_data_links(block) {
                        push_unique(&mut acc, link);
                    }
                    acc
                }),
        };

        if !findings.is_empty() {
            debug!("Found {} map link(s) on {}", findings.total(), page_url);
        }

        findings
    }

    fn direct_links(&self, document: &Html, page_url: &Url) -> Vec<String> {
        let mut links = Vec::new();
        let Ok(selector) = Selector::parse("a[href]") else {
            return links;
        };

        for href in document.select(&selector).filter_map(|a| a.value().attr("href")) {
            if !self.rules.is_map_url(href) {
                continue;
            }
            let link = normalize_link(href, page_url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.trim().to_string());
            push_unique(&mut links, link);
        }

        links
    }

    fn iframe_links(&self, document: &Html) -> Vec<String> {
        let mut links = Vec::new();
        let Ok(selector) = Selector::parse("iframe[src]") else {
            return links;
        };

        for src in document.select(&selector).filter_map(|f| f.value().attr("src")) {
            if self.rules.is_iframe_map_url(src) {
                push_unique(&mut links, src.trim().to_string());
            }
        }

        links
    }

    fn script_links(&self, document: &Html) -> Vec<String> {
        let mut links = Vec::new();
        let Ok(selector) = Selector::parse("script") else {
            return links;
        };

        for script in document.select(&selector) {
            let text: String = script.text().collect();
            for pattern in self.rules.script_patterns() {
                for m in pattern.find_iter(&text) {
                    let link = m.as_str().trim_matches(|c| c == '"' || c == '\'');
                    push_unique(&mut links, link.to_string());
                }
            }
        }

        links
    }
}

/// Derives map URLs from one decoded structured-data block
///
/// Arrays and `@graph` containers are walked recursively. For each object the
/// first available source wins:
/// 1. an explicit `hasMap` reference
/// 2. `geo` coordinates (top level or under `location`), giving a
///    coordinate query URL
/// 3. postal `address` fields, giving a search-by-address URL
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use site_atlas::maps::structured_data_links;
///
/// let block = json!({"geo": {"latitude": 40.0, "longitude": -73.9}});
/// assert_eq!(
///     structured_data_links(&block),
///     vec!["https://www.google.com/maps?q=40.0,-73.9".to_string()]
/// );
/// ```
pub fn structured_data_links(block: &Value) -> Vec<String> {
    let mut links = Vec::new();
    walk(block, &mut links);
    links
}

fn walk(value: &Value, links: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(item, links);
            }
        }
        Value::Object(object) => {
            if let Some(link) = object_map_link(object) {
                push_unique(links, link);
            }
            if let Some(graph) = object.get("@graph") {
                walk(graph, links);
            }
        }
        _ => {}
    }
}

fn object_map_link(object: &Map<String, Value>) -> Option<String> {
    if let Some(link) = object.get("hasMap").and_then(map_reference) {
        return Some(link);
    }

    let location = object.get("location");

    let geo = object
        .get("geo")
        .or_else(|| location.and_then(|l| l.get("geo")));
    if let Some(link) = geo.and_then(coordinate_link) {
        return Some(link);
    }

    let address = object
        .get("address")
        .or_else(|| location.and_then(|l| l.get("address")));
    address.and_then(address_link)
}

fn map_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(o) => o
            .get("url")
            .or_else(|| o.get("@id"))
            .and_then(map_reference),
        Value::Array(items) => items.iter().find_map(map_reference),
        _ => None,
    }
}

fn coordinate_link(geo: &Value) -> Option<String> {
    let latitude = coordinate(geo.get("latitude")?)?;
    let longitude = coordinate(geo.get("longitude")?)?;
    Some(format!(
        "https://www.google.com/maps?q={},{}",
        latitude, longitude
    ))
}

fn coordinate(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn address_link(address: &Value) -> Option<String> {
    let joined = match address {
        Value::Object(fields) => ADDRESS_FIELDS
            .iter()
            .filter_map(|f| fields.get(*f).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    if joined.is_empty() {
        return None;
    }

    Some(format!(
        "https://www.google.com/maps/search/{}",
        joined.replace(' ', "+")
    ))
}

fn push_unique(links: &mut Vec<String>, link: String) {
    if !links.contains(&link) {
        links.push(link);
    }
}
