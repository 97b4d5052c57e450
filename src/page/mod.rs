//! Page analysis
//!
//! A [`PageRecord`] is the retained snapshot of one successfully fetched page
//! plus everything derived from its content. It is built once by the
//! [`PageAnalyzer`] and never modified afterwards.

mod analyzer;

pub use analyzer::{PageAnalyzer, PageOutcome};

use crate::maps::PageMapFindings;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Coarse page category derived from URL keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    About,
    Contact,
    Product,
    Blog,
    Team,
    General,
}

impl PageType {
    /// Keyword table evaluated in order, first match wins
    const RULES: [(PageType, &'static [&'static str]); 5] = [
        (PageType::About, &["about", "story", "company"]),
        (PageType::Contact, &["contact", "reach", "touch"]),
        (PageType::Product, &["product", "service", "solution"]),
        (PageType::Blog, &["blog", "news", "article"]),
        (PageType::Team, &["team", "staff", "people"]),
    ];

    pub fn from_url(url: &str) -> Self {
        let url = url.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| url.contains(k)))
            .map(|(page_type, _)| *page_type)
            .unwrap_or(PageType::General)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Contact => "contact",
            Self::Product => "product",
            Self::Blog => "blog",
            Self::Team => "team",
            Self::General => "general",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot and derived metadata of one fetched page
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: Url,
    #[serde(skip_serializing)]
    pub content: String,
    pub status: u16,
    pub fetch_latency_ms: u64,
    pub depth: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub word_count: usize,
    pub meta_tags: Vec<BTreeMap<String, String>>,
    pub structured_data: Vec<Value>,
    pub page_type: PageType,
    pub is_about_page: bool,
    pub is_contact_page: bool,
    pub maps_found: PageMapFindings,
    pub fetched_at: DateTime<Utc>,
}
