//! Link discovery module
//!
//! This module turns one fetched page into classified outbound links:
//! - `extractor`: parses anchors, resolves and filters targets, and records
//!   structural placement and surrounding context
//! - `classifier`: labels each candidate by its relationship to the crawled site
//! - `rules`: the ordered, data-driven rule tables both of them consult

mod classifier;
mod extractor;
pub mod rules;

pub use classifier::LinkClassifier;
pub use extractor::{extract_links, extract_links_from_html};
pub use rules::RuleSet;

use serde::Serialize;
use std::fmt;
use url::Url;

/// Relationship of a link target to the crawled site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Internal,
    External,
    Social,
    Contact,
    Maps,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Social => "social",
            Self::Contact => "contact",
            Self::Maps => "maps",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural region of the page a link sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    Body,
    Header,
    Footer,
    Dropdown,
    #[serde(rename = "subdropdown")]
    SubDropdown,
    Mobile,
    #[serde(rename = "quicklinks")]
    QuickLinks,
    Homepage,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Dropdown => "dropdown",
            Self::SubDropdown => "subdropdown",
            Self::Mobile => "mobile",
            Self::QuickLinks => "quicklinks",
            Self::Homepage => "homepage",
        }
    }

    /// Placements that mark a link as part of site navigation
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Header | Self::Dropdown | Self::SubDropdown)
    }

    pub fn is_footer(&self) -> bool {
        matches!(self, Self::Footer)
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural placement of an anchor
///
/// The flags accumulate while placement rules are applied, so a link can end
/// up flagged both navigation and footer even though `menu_type` holds only
/// the last placement assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub menu_type: MenuType,
    pub is_navigation: bool,
    pub is_footer: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            menu_type: MenuType::Body,
            is_navigation: false,
            is_footer: false,
        }
    }
}

impl Placement {
    /// Assigns a new placement, keeping any flag already set
    pub(crate) fn assign(&mut self, menu_type: MenuType) {
        self.menu_type = menu_type;
        self.is_navigation |= menu_type.is_navigation();
        self.is_footer |= menu_type.is_footer();
    }
}

/// An extracted, not yet classified link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCandidate {
    pub url: Url,
    pub anchor_text: String,
    pub source_page: String,
    pub depth: u32,
    pub placement: Placement,
    pub context: String,
    pub css_classes: String,
}

/// One classified outbound reference found on a page
///
/// `depth` is the depth of the page the link was found on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredLink {
    pub url: Url,
    pub anchor_text: String,
    pub source_page: String,
    pub depth: u32,
    pub link_type: LinkType,
    pub is_navigation: bool,
    pub is_footer: bool,
    pub is_contact: bool,
    pub is_about: bool,
    pub is_google_maps: bool,
    pub menu_type: MenuType,
    pub context: String,
    pub css_classes: String,
}
