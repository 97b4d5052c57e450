//! Map-resource detection
//!
//! Map references are gathered per page over four independent channels:
//! - direct anchors pointing at a map provider
//! - embedded map frames
//! - map URLs inside inline scripts
//! - structured data (explicit map reference, coordinates, or postal address)
//!
//! The [`MapsAggregator`] reconciles the per-page findings of a whole crawl
//! into one [`MapsInfo`] record with a single primary link.

mod aggregator;
mod detector;

pub use aggregator::{select_primary, MapsAggregator};
pub use detector::{structured_data_links, MapsDetector};

use serde::Serialize;
use std::fmt;

/// Map URLs found on one page, per channel, each list without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMapFindings {
    pub direct: Vec<String>,
    pub iframe: Vec<String>,
    pub script: Vec<String>,
    pub structured_data: Vec<String>,
}

impl PageMapFindings {
    /// All findings in channel order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.direct
            .iter()
            .chain(&self.iframe)
            .chain(&self.script)
            .chain(&self.structured_data)
    }

    pub fn total(&self) -> usize {
        self.direct.len() + self.iframe.len() + self.script.len() + self.structured_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegrationStatus {
    Integrated,
    #[serde(rename = "Not Found")]
    NotFound,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integrated => "Integrated",
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consolidated map-resource record for one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapsInfo {
    pub direct: Vec<String>,
    pub iframe: Vec<String>,
    pub script: Vec<String>,
    pub structured_data: Vec<String>,
    /// Findings from pages flagged as contact pages
    pub contact_page: Vec<String>,
    /// Union of every channel on every page, in first-insertion order
    pub all_links: Vec<String>,
    pub primary_link: Option<String>,
    pub integration_status: IntegrationStatus,
    pub total_found: usize,
}

impl Default for MapsInfo {
    fn default() -> Self {
        MapsAggregator::default().finish()
    }
}
