use crate::links::rules::PRIMARY_LINK_PRIORITY;
use crate::maps::{IntegrationStatus, MapsInfo, PageMapFindings};
use std::collections::HashSet;

/// Reconciles per-page map findings across a crawl
///
/// Every list keeps first-insertion order and holds no duplicates, so the
/// aggregate set is exactly the union of all channel findings of all pages.
#[derive(Debug, Default)]
pub struct MapsAggregator {
    direct: Vec<String>,
    iframe: Vec<String>,
    script: Vec<String>,
    structured_data: Vec<String>,
    contact_page: Vec<String>,
    all_links: Vec<String>,
    seen: HashSet<String>,
}

impl MapsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the findings of one page
    ///
    /// Findings of a contact page are also recorded in the contact-page subset.
    pub fn record_page(&mut self, findings: &PageMapFindings, is_contact_page: bool) {
        extend_unique(&mut self.direct, &findings.direct);
        extend_unique(&mut self.iframe, &findings.iframe);
        extend_unique(&mut self.script, &findings.script);
        extend_unique(&mut self.structured_data, &findings.structured_data);

        for link in findings.iter() {
            if is_contact_page && !self.contact_page.contains(link) {
                self.contact_page.push(link.clone());
            }
            if self.seen.insert(link.clone()) {
                self.all_links.push(link.clone());
            }
        }
    }

    pub fn total_found(&self) -> usize {
        self.all_links.len()
    }

    /// Consumes the aggregator and produces the consolidated record
    pub fn finish(self) -> MapsInfo {
        let primary_link = select_primary(&self.all_links);
        let integration_status = if self.all_links.is_empty() {
            IntegrationStatus::NotFound
        } else {
            IntegrationStatus::Integrated
        };

        MapsInfo {
            total_found: self.all_links.len(),
            direct: self.direct,
            iframe: self.iframe,
            script: self.script,
            structured_data: self.structured_data,
            contact_page: self.contact_page,
            all_links: self.all_links,
            primary_link,
            integration_status,
        }
    }
}

/// Picks the most specific map link
///
/// Priority patterns are tried in order (place, then directions, then generic
/// map URLs) and the first link matching the highest-ranked pattern is
/// returned. When no pattern matches, the first link is returned.
pub fn select_primary(links: &[String]) -> Option<String> {
    let lowered: Vec<String> = links.iter().map(|l| l.to_lowercase()).collect();

    PRIMARY_LINK_PRIORITY
        .iter()
        .find_map(|pattern| lowered.iter().position(|l| l.contains(pattern)))
        .or(if links.is_empty() { None } else { Some(0) })
        .map(|idx| links[idx].clone())
}

fn extend_unique(target: &mut Vec<String>, links: &[String]) {
    for link in links {
        if !target.contains(link) {
            target.push(link.clone());
        }
    }
}
