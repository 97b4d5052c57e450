//! Markdown sitemap summary generation
//!
//! This module generates the human-readable summary of one site map:
//! discovery statistics, link classification counts, the maps analysis, the
//! internal link structure, and external connections.

use crate::links::DiscoveredLink;
use crate::output::OutputResult;
use crate::sitemap::SiteMap;
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of URLs listed per internal link group
const GROUP_PREVIEW: usize = 5;

/// Number of external domains listed
const TOP_EXTERNAL_DOMAINS: usize = 10;

/// Writes the markdown summary of a site map
///
/// # Arguments
///
/// * `site_map` - The site map to summarize
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(site_map: &SiteMap, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(site_map);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a site map as markdown
pub fn format_markdown_summary(site_map: &SiteMap) -> String {
    let mut md = String::new();
    let maps = &site_map.maps_info;

    // Title
    md.push_str("# Site Atlas Sitemap Summary\n\n");
    md.push_str(&format!("- **Domain**: {}\n", site_map.domain));
    md.push_str(&format!("- **Main URL**: {}\n", site_map.main_url));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));

    // Discovery statistics
    md.push_str("## Discovery Statistics\n\n");
    md.push_str(&format!(
        "- **Total Pages Discovered**: {}\n",
        site_map.total_pages
    ));
    md.push_str(&format!("- **Total Links Found**: {}\n", site_map.total_links));
    md.push_str(&format!(
        "- **Maximum Crawl Depth Reached**: {}\n",
        site_map.crawl_depth_reached
    ));
    md.push_str(&format!("- **Complexity**: {}\n\n", site_map.complexity));

    // Link classification
    md.push_str("## Link Classification\n\n");
    md.push_str("| Category | Count |\n");
    md.push_str("|----------|-------|\n");
    md.push_str(&format!("| Internal | {} |\n", site_map.internal_links.len()));
    md.push_str(&format!("| External | {} |\n", site_map.external_links.len()));
    md.push_str(&format!("| Social | {} |\n", site_map.social_links.len()));
    md.push_str(&format!("| Contact | {} |\n", site_map.contact_links.len()));
    md.push_str(&format!("| Maps | {} |\n\n", site_map.maps_links.len()));

    // Maps analysis
    md.push_str("## Maps Analysis\n\n");
    md.push_str(&format!(
        "- **Integration Status**: {}\n",
        maps.integration_status
    ));
    md.push_str(&format!("- **Total Map Links Found**: {}\n", maps.total_found));
    md.push_str(&format!(
        "- **Primary Map Link**: {}\n\n",
        maps.primary_link.as_deref().unwrap_or("Not found")
    ));

    md.push_str("| Detection Channel | Found |\n");
    md.push_str("|-------------------|-------|\n");
    md.push_str(&format!("| Direct links | {} |\n", maps.direct.len()));
    md.push_str(&format!("| Iframe embeds | {} |\n", maps.iframe.len()));
    md.push_str(&format!("| Scripts | {} |\n", maps.script.len()));
    md.push_str(&format!(
        "| Structured data | {} |\n",
        maps.structured_data.len()
    ));
    md.push_str(&format!("| Contact pages | {} |\n\n", maps.contact_page.len()));

    if maps.all_links.is_empty() {
        md.push_str("No map links found.\n\n");
    } else {
        md.push_str("### All Map Links\n\n");
        for (i, link) in maps.all_links.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, link));
        }
        md.push('\n');
    }

    // Internal link structure
    md.push_str("## Internal Link Structure\n\n");
    for (group, links) in internal_groups(&site_map.internal_links) {
        if links.is_empty() {
            continue;
        }
        md.push_str(&format!("### {} ({})\n\n", group, links.len()));
        for link in links.iter().take(GROUP_PREVIEW) {
            md.push_str(&format!("- {}\n", link.url));
        }
        if links.len() > GROUP_PREVIEW {
            md.push_str(&format!("- ... and {} more\n", links.len() - GROUP_PREVIEW));
        }
        md.push('\n');
    }

    // External connections
    md.push_str("## Social Media Presence\n\n");
    if site_map.social_links.is_empty() {
        md.push_str("No social media links found.\n\n");
    } else {
        for link in &site_map.social_links {
            md.push_str(&format!("- {} (from: {})\n", link.url, link.source_page));
        }
        md.push('\n');
    }

    md.push_str(&format!(
        "## External References ({} total)\n\n",
        site_map.external_links.len()
    ));
    let domains = external_domains(&site_map.external_links);
    if domains.is_empty() {
        md.push_str("No external links found.\n");
    } else {
        md.push_str("| Domain | Links |\n");
        md.push_str("|--------|-------|\n");
        for (domain, count) in domains.iter().take(TOP_EXTERNAL_DOMAINS) {
            md.push_str(&format!("| {} | {} |\n", domain, count));
        }
    }

    md
}

/// Buckets internal links for the structure section
///
/// Each link lands in the first group it qualifies for, in the order
/// about, contact, navigation, footer, general.
fn internal_groups(links: &[DiscoveredLink]) -> [(&'static str, Vec<&DiscoveredLink>); 5] {
    let mut groups = [
        ("About Pages", Vec::new()),
        ("Contact Pages", Vec::new()),
        ("Navigation Links", Vec::new()),
        ("Footer Links", Vec::new()),
        ("General Pages", Vec::new()),
    ];

    for link in links {
        let slot = if link.is_about {
            0
        } else if link.is_contact {
            1
        } else if link.is_navigation {
            2
        } else if link.is_footer {
            3
        } else {
            4
        };
        groups[slot].1.push(link);
    }

    groups
}

/// Counts external links per host, most linked first
///
/// Ties keep first-seen order.
fn external_domains(links: &[DiscoveredLink]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for link in links {
        let host = link.url.host_str().unwrap_or_default();
        match counts.iter_mut().find(|(h, _)| h == host) {
            Some((_, count)) => *count += 1,
            None => counts.push((host.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
