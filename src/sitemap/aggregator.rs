use crate::links::{DiscoveredLink, LinkType};
use crate::maps::MapsInfo;
use crate::sitemap::{Complexity, SiteMap};

/// Accumulates classified links for one site
///
/// Lists only ever grow while the crawl runs; [`finalize`](Self::finalize)
/// consumes the aggregator so a site map is produced exactly once.
#[derive(Debug)]
pub struct SiteMapAggregator {
    domain: String,
    main_url: String,
    total_links: usize,
    internal_links: Vec<DiscoveredLink>,
    external_links: Vec<DiscoveredLink>,
    social_links: Vec<DiscoveredLink>,
    contact_links: Vec<DiscoveredLink>,
    maps_links: Vec<DiscoveredLink>,
    crawl_depth_reached: u32,
}

impl SiteMapAggregator {
    pub fn new(domain: impl Into<String>, main_url: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            main_url: main_url.into(),
            total_links: 0,
            internal_links: Vec::new(),
            external_links: Vec::new(),
            social_links: Vec::new(),
            contact_links: Vec::new(),
            maps_links: Vec::new(),
            crawl_depth_reached: 0,
        }
    }

    /// Notes that a page at `depth` was fetched
    pub fn record_page(&mut self, depth: u32) {
        self.crawl_depth_reached = self.crawl_depth_reached.max(depth);
    }

    /// Appends a link to the list for its category
    pub fn record(&mut self, link: DiscoveredLink) {
        self.total_links += 1;
        match link.link_type {
            LinkType::Internal => self.internal_links.push(link),
            LinkType::External => self.external_links.push(link),
            LinkType::Social => self.social_links.push(link),
            LinkType::Contact => self.contact_links.push(link),
            LinkType::Maps => self.maps_links.push(link),
        }
    }

    /// Produces the final site map
    ///
    /// # Arguments
    ///
    /// * `total_pages` - Number of distinct URLs discovered for the site
    /// * `maps_info` - Consolidated map-resource record
    pub fn finalize(self, total_pages: usize, maps_info: MapsInfo) -> SiteMap {
        SiteMap {
            domain: self.domain,
            main_url: self.main_url,
            total_pages,
            total_links: self.total_links,
            internal_links: self.internal_links,
            external_links: self.external_links,
            social_links: self.social_links,
            contact_links: self.contact_links,
            maps_links: self.maps_links,
            maps_info,
            crawl_depth_reached: self.crawl_depth_reached,
            complexity: Complexity::from_total_pages(total_pages),
        }
    }
}
