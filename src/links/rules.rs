//! Ordered rule tables for link classification and map detection
//!
//! Every table here is evaluated first-match-wins in declaration order, except
//! the menu class rules which the extractor applies last-match-wins.

use crate::config::RulesConfig;
use crate::links::MenuType;
use crate::url::matches_domain_pattern;
use crate::{ConfigError, ConfigResult};
use regex::{Regex, RegexBuilder};

/// Substrings identifying a map-provider URL
pub const MAP_URL_PATTERNS: [&str; 4] = [
    "google.com/maps",
    "maps.google.com",
    "goo.gl/maps",
    "maps.app.goo.gl",
];

/// Map hosts accepted as embedded frame sources (general and place forms only)
pub const IFRAME_MAP_PATTERNS: [&str; 2] = ["maps.google.com", "google.com/maps"];

/// Map URLs as they appear inside inline script text
pub const SCRIPT_MAP_PATTERNS: [&str; 4] = [
    r#"https?://(?:www\.)?google\.com/maps[^\s"'<>]*"#,
    r#"https?://(?:www\.)?maps\.google\.com[^\s"'<>]*"#,
    r#"https?://goo\.gl/maps/[^\s"'<>]*"#,
    r#"https?://maps\.app\.goo\.gl/[^\s"'<>]*"#,
];

/// Primary-link preference: specific places, then directions, then generic maps
pub const PRIMARY_LINK_PRIORITY: [&str; 6] = [
    "maps.google.com/place/",
    "google.com/maps/place/",
    "maps.google.com/dir/",
    "google.com/maps/dir/",
    "maps.google.com",
    "google.com/maps",
];

/// Class-pattern placement rules, applied to the anchor's own classes
const MENU_CLASS_RULES: [(MenuType, &str); 6] = [
    (
        MenuType::Header,
        r"header|top[-_]?menu|main[-_]?nav|primary[-_]?menu|menu[-_]?primary[-_]?navigation|genesis[-_]?nav[-_]?menu|slideout[-_]?menu[-_]?toggle",
    ),
    (MenuType::Footer, r"footer|bottom[-_]?menu"),
    (
        MenuType::Dropdown,
        r"drop[-_]?down|has[-_]?children|sub[-_]?menu|child[-_]?menu",
    ),
    (MenuType::SubDropdown, r"sub[-_]?dropdown|grandchild|sub-sub"),
    (MenuType::Mobile, r"mobile[-_]?menu"),
    (MenuType::QuickLinks, r"quick[-_]?links"),
];

/// id/class tokens marking an ancestor as a navigation region
pub const NAV_LANDMARK_TOKENS: [&str; 5] = ["nav", "menu", "header", "navbar", "navigation"];

/// id/class tokens marking an ancestor as a footer region
pub const FOOTER_LANDMARK_TOKENS: [&str; 3] = ["footer", "bottom", "copyright"];

/// How many ancestors the landmark search climbs
pub const LANDMARK_SEARCH_DEPTH: usize = 5;

/// Block-level elements whose text becomes a link's context
pub const CONTEXT_TAGS: [&str; 8] = [
    "p", "div", "li", "section", "article", "main", "header", "footer",
];

pub const CONTEXT_MAX_CHARS: usize = 500;

/// A compiled class-pattern placement rule
#[derive(Debug, Clone)]
pub struct MenuRule {
    pub menu_type: MenuType,
    pattern: Regex,
}

impl MenuRule {
    pub fn matches(&self, haystack: &str) -> bool {
        self.pattern.is_match(haystack)
    }
}

/// The complete set of classification heuristics for one crawl
#[derive(Debug, Clone)]
pub struct RuleSet {
    excluded_extensions: Vec<String>,
    social_domains: Vec<String>,
    contact_keywords: Vec<String>,
    about_keywords: Vec<String>,
    block_signatures: Vec<String>,
    menu_rules: Vec<MenuRule>,
    script_patterns: Vec<Regex>,
}

impl RuleSet {
    /// Builds a rule set from configured lists plus the fixed pattern tables
    ///
    /// Keyword and signature lists are lowercased once here so that matching
    /// can work on lowercased input.
    pub fn from_config(config: &RulesConfig) -> ConfigResult<Self> {
        let menu_rules = MENU_CLASS_RULES
            .iter()
            .map(|(menu_type, pattern)| {
                Ok(MenuRule {
                    menu_type: *menu_type,
                    pattern: case_insensitive(pattern)?,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let script_patterns = SCRIPT_MAP_PATTERNS
            .iter()
            .map(|p| case_insensitive(p))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            excluded_extensions: lowercase(&config.excluded_extensions),
            social_domains: lowercase(&config.social_domains),
            contact_keywords: lowercase(&config.contact_keywords),
            about_keywords: lowercase(&config.about_keywords),
            block_signatures: lowercase(&config.block_signatures),
            menu_rules,
            script_patterns,
        })
    }

    /// Rule set built from the default lists
    pub fn standard() -> ConfigResult<Self> {
        Self::from_config(&RulesConfig::default())
    }

    pub fn excluded_extensions(&self) -> &[String] {
        &self.excluded_extensions
    }

    pub fn menu_rules(&self) -> &[MenuRule] {
        &self.menu_rules
    }

    pub fn script_patterns(&self) -> &[Regex] {
        &self.script_patterns
    }

    /// Returns true if `domain` (already stripped of `www.`) is a social network
    pub fn is_social_domain(&self, domain: &str) -> bool {
        self.social_domains
            .iter()
            .any(|pattern| matches_domain_pattern(pattern, domain))
    }

    /// Returns the first map-URL pattern the URL contains
    pub fn map_pattern(&self, url: &str) -> Option<&'static str> {
        let url = url.to_lowercase();
        MAP_URL_PATTERNS.into_iter().find(|p| url.contains(p))
    }

    pub fn is_map_url(&self, url: &str) -> bool {
        self.map_pattern(url).is_some()
    }

    pub fn is_iframe_map_url(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        IFRAME_MAP_PATTERNS.iter().any(|p| url.contains(p))
    }

    /// Returns true if the URL or anchor text contains a contact keyword
    pub fn mentions_contact(&self, url: &str, anchor_text: &str) -> bool {
        contains_any(&self.contact_keywords, url, anchor_text)
    }

    /// Returns true if the URL or anchor text contains an about keyword
    pub fn mentions_about(&self, url: &str, anchor_text: &str) -> bool {
        contains_any(&self.about_keywords, url, anchor_text)
    }

    /// Returns the first block/challenge signature found in the content
    pub fn block_signature(&self, content: &str) -> Option<&str> {
        let content = content.to_lowercase();
        self.block_signatures
            .iter()
            .find(|sig| content.contains(sig.as_str()))
            .map(String::as_str)
    }
}

fn contains_any(keywords: &[String], url: &str, anchor_text: &str) -> bool {
    let url = url.to_lowercase();
    let anchor = anchor_text.to_lowercase();
    keywords
        .iter()
        .any(|kw| url.contains(kw.as_str()) || anchor.contains(kw.as_str()))
}

fn lowercase(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

fn case_insensitive(pattern: &str) -> ConfigResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleSet {
        RuleSet::standard().unwrap()
    }

    #[test]
    fn test_standard_rules_compile() {
        let rules = rules();
        assert_eq!(rules.menu_rules().len(), MENU_CLASS_RULES.len());
        assert_eq!(rules.script_patterns().len(), SCRIPT_MAP_PATTERNS.len());
    }

    #[test]
    fn test_map_patterns() {
        let rules = rules();
        assert!(rules.is_map_url("https://www.google.com/maps/place/Acme"));
        assert!(rules.is_map_url("https://MAPS.GOOGLE.COM/?q=1"));
        assert!(rules.is_map_url("https://goo.gl/maps/abc"));
        assert!(rules.is_map_url("https://maps.app.goo.gl/xyz"));
        assert!(!rules.is_map_url("https://www.google.com/search?q=maps"));
        assert_eq!(
            rules.map_pattern("https://maps.google.com/maps?q=x"),
            Some("maps.google.com")
        );
    }

    #[test]
    fn test_iframe_patterns_are_restricted() {
        let rules = rules();
        assert!(rules.is_iframe_map_url("https://www.google.com/maps/embed?pb=1"));
        assert!(rules.is_iframe_map_url("https://maps.google.com/maps?q=x&output=embed"));
        assert!(!rules.is_iframe_map_url("https://goo.gl/maps/abc"));
        assert!(!rules.is_iframe_map_url("https://maps.app.goo.gl/xyz"));
    }

    #[test]
    fn test_social_domains() {
        let rules = rules();
        assert!(rules.is_social_domain("facebook.com"));
        assert!(rules.is_social_domain("t.me"));
        assert!(!rules.is_social_domain("m.facebook.com"));
        assert!(!rules.is_social_domain("example.com"));
    }

    #[test]
    fn test_wildcard_social_domain_from_config() {
        let mut config = RulesConfig::default();
        config.social_domains = vec!["*.facebook.com".to_string()];
        let rules = RuleSet::from_config(&config).unwrap();

        assert!(rules.is_social_domain("m.facebook.com"));
        assert!(rules.is_social_domain("facebook.com"));
        assert!(!rules.is_social_domain("twitter.com"));
    }

    #[test]
    fn test_keyword_matching() {
        let rules = rules();
        assert!(rules.mentions_contact("https://example.com/contact-us", ""));
        assert!(rules.mentions_contact("https://example.com/x", "Call Us Today"));
        assert!(!rules.mentions_contact("https://example.com/pricing", "Pricing"));

        assert!(rules.mentions_about("https://example.com/about", ""));
        assert!(rules.mentions_about("https://example.com/x", "Who We Are"));
        assert!(!rules.mentions_about("https://example.com/x", "Shop"));
    }

    #[test]
    fn test_block_signature_first_match() {
        let rules = rules();
        assert_eq!(
            rules.block_signature("<title>Just a moment...</title> cloudflare"),
            Some("just a moment...")
        );
        assert_eq!(
            rules.block_signature("Please complete the CAPTCHA"),
            Some("captcha")
        );
        assert_eq!(rules.block_signature("<h1>Welcome</h1>"), None);
    }

    #[test]
    fn test_menu_rules_case_insensitive() {
        let rules = rules();
        let footer = rules
            .menu_rules()
            .iter()
            .find(|r| r.menu_type == MenuType::Footer)
            .unwrap();
        assert!(footer.matches("Site-FOOTER-link"));
        assert!(footer.matches("bottom_menu"));
        assert!(!footer.matches("top-menu"));
    }

    #[test]
    fn test_primary_priority_order() {
        let place = PRIMARY_LINK_PRIORITY
            .iter()
            .position(|p| *p == "google.com/maps/place/")
            .unwrap();
        let generic = PRIMARY_LINK_PRIORITY
            .iter()
            .position(|p| *p == "google.com/maps")
            .unwrap();
        assert!(place < generic);
    }
}
