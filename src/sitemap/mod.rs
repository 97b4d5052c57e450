//! Site map aggregation
//!
//! The [`SiteMapAggregator`] collects classified links per category while the
//! crawl runs and produces one finalized [`SiteMap`] when it ends.

mod aggregator;
mod complexity;

pub use aggregator::SiteMapAggregator;
pub use complexity::Complexity;

use crate::links::DiscoveredLink;
use crate::maps::MapsInfo;
use serde::Serialize;
use std::collections::HashSet;

/// Structural map of one crawled site
#[derive(Debug, Clone, Serialize)]
pub struct SiteMap {
    pub domain: String,
    pub main_url: String,
    pub total_pages: usize,
    pub total_links: usize,
    pub internal_links: Vec<DiscoveredLink>,
    pub external_links: Vec<DiscoveredLink>,
    pub social_links: Vec<DiscoveredLink>,
    pub contact_links: Vec<DiscoveredLink>,
    pub maps_links: Vec<DiscoveredLink>,
    pub maps_info: MapsInfo,
    pub crawl_depth_reached: u32,
    pub complexity: Complexity,
}

impl SiteMap {
    /// Category lists with repeated targets removed, keeping first occurrences
    ///
    /// The same target is usually linked from many pages; exports only need
    /// it once per category.
    pub fn deduplicated(&self) -> SiteMap {
        let mut map = self.clone();
        for list in [
            &mut map.internal_links,
            &mut map.external_links,
            &mut map.social_links,
            &mut map.contact_links,
            &mut map.maps_links,
        ] {
            let mut seen = HashSet::new();
            list.retain(|link| seen.insert(link.url.clone()));
        }
        map
    }
}
