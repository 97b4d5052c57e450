//! HTML link extraction
//!
//! Extracts every followable anchor from a parsed page together with its
//! anchor text, surrounding block context, class string, and structural
//! placement. Extraction is a single pass over the document and never touches
//! the network.

use crate::links::rules::{
    RuleSet, CONTEXT_MAX_CHARS, CONTEXT_TAGS, FOOTER_LANDMARK_TOKENS, LANDMARK_SEARCH_DEPTH,
    NAV_LANDMARK_TOKENS,
};
use crate::links::{LinkCandidate, MenuType, Placement};
use crate::url::{excluded_extension, normalize_link, site_root};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Parses HTML content and extracts link candidates
///
/// Convenience wrapper around [`extract_links`] for callers holding raw
/// content rather than a parsed document.
pub fn extract_links_from_html(
    html: &str,
    base_url: &Url,
    depth: u32,
    rules: &RuleSet,
) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    extract_links(&document, base_url, depth, rules)
}

/// Extracts all followable links from a parsed document
///
/// # Extraction Rules
///
/// **Skipped:**
/// - empty targets, in-page `#` fragments
/// - `mailto:`, `tel:`, `javascript:` and any other non-http(s) scheme
/// - targets whose path ends with an excluded extension
///
/// Surviving targets are resolved against `base_url` and have their fragment
/// removed. Document order is preserved.
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `base_url` - URL of the page, used to resolve relative targets
/// * `depth` - Crawl depth of the page
/// * `rules` - Extension and placement rules
pub fn extract_links(
    document: &Html,
    base_url: &Url,
    depth: u32,
    rules: &RuleSet,
) -> Vec<LinkCandidate> {
    let mut links = Vec::new();
    let root = site_root(base_url);

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let url = match normalize_link(href, base_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping link {:?}: {}", href, e);
                continue;
            }
        };

        if let Some(ext) = excluded_extension(&url, rules.excluded_extensions()) {
            debug!("Skipping {} link: {}", ext, url);
            continue;
        }

        let mut placement = placement(&element, rules);
        if placement.menu_type == MenuType::Body && url == root {
            placement.assign(MenuType::Homepage);
        }

        links.push(LinkCandidate {
            anchor_text: collapse_whitespace(element.text()),
            source_page: base_url.to_string(),
            depth,
            placement,
            context: context(&element),
            css_classes: element.value().attr("class").unwrap_or("").trim().to_string(),
            url,
        });
    }

    links
}

/// Determines the structural placement of an anchor
///
/// Ancestor landmarks are searched first (nearest wins). The class rules are
/// then applied to the anchor's own classes in order and each match overwrites
/// the placement, so the last matching rule decides `menu_type` while the
/// navigation and footer flags only ever accumulate.
fn placement(element: &ElementRef, rules: &RuleSet) -> Placement {
    let mut placement = Placement::default();

    if let Some(menu_type) = landmark(element, rules) {
        placement.assign(menu_type);
    }

    let classes = element.value().attr("class").unwrap_or("");
    if !classes.trim().is_empty() {
        for rule in rules.menu_rules() {
            if rule.matches(classes) {
                placement.assign(rule.menu_type);
            }
        }
    }

    placement
}

/// Searches up to `LANDMARK_SEARCH_DEPTH` ancestors for a navigation or footer region
fn landmark(element: &ElementRef, rules: &RuleSet) -> Option<MenuType> {
    let ancestors = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(LANDMARK_SEARCH_DEPTH);

    for ancestor in ancestors {
        let value = ancestor.value();
        match value.name() {
            "nav" | "header" => return Some(MenuType::Header),
            "footer" => return Some(MenuType::Footer),
            _ => {}
        }

        let attrs = format!(
            "{} {}",
            value.attr("id").unwrap_or(""),
            value.attr("class").unwrap_or("")
        )
        .to_lowercase();
        if attrs.trim().is_empty() {
            continue;
        }

        if let Some(rule) = rules.menu_rules().iter().find(|r| r.matches(&attrs)) {
            return Some(rule.menu_type);
        }

        let tokens: Vec<&str> = attrs
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.iter().any(|t| NAV_LANDMARK_TOKENS.contains(t)) {
            return Some(MenuType::Header);
        }
        if tokens.iter().any(|t| FOOTER_LANDMARK_TOKENS.contains(t)) {
            return Some(MenuType::Footer);
        }
    }

    None
}

/// Text of the nearest enclosing block element, whitespace-collapsed and truncated
fn context(element: &ElementRef) -> String {
    let block = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| CONTEXT_TAGS.contains(&a.value().name()));

    match block {
        Some(block) => truncate(&collapse_whitespace(block.text()), CONTEXT_MAX_CHARS),
        None => String::new(),
    }
}

fn collapse_whitespace<'a>(text: impl Iterator<Item = &'a str>) -> String {
    text.flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
