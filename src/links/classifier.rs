use crate::links::{DiscoveredLink, LinkCandidate, LinkType, RuleSet};
use crate::url::site_domain;
use crate::{UrlError, UrlResult};
use std::sync::Arc;
use url::Url;

/// Labels link candidates relative to the crawled site
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    root_domain: String,
    rules: Arc<RuleSet>,
}

impl LinkClassifier {
    /// Creates a classifier for the site `main_url` belongs to
    pub fn new(main_url: &Url, rules: Arc<RuleSet>) -> UrlResult<Self> {
        let root_domain = site_domain(main_url).ok_or(UrlError::MissingDomain)?;
        Ok(Self { root_domain, rules })
    }

    /// The crawled site's domain, without `www.`
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Returns true if the URL belongs to the crawled site
    pub fn is_internal(&self, url: &Url) -> bool {
        site_domain(url).as_deref() == Some(self.root_domain.as_str())
    }

    /// Determines the link type
    ///
    /// Rules are evaluated in order and the first match wins:
    /// 1. same domain: `Internal`
    /// 2. social network domain: `Social`
    /// 3. map-provider URL: `Maps`
    /// 4. URL or anchor text mentions a contact keyword: `Contact`
    /// 5. anything else: `External`
    pub fn link_type(&self, url: &Url, anchor_text: &str) -> LinkType {
        if self.is_internal(url) {
            return LinkType::Internal;
        }
        let Some(domain) = site_domain(url) else {
            return LinkType::External;
        };

        if self.rules.is_social_domain(&domain) {
            LinkType::Social
        } else if self.rules.is_map_url(url.as_str()) {
            LinkType::Maps
        } else if self.rules.mentions_contact(url.as_str(), anchor_text) {
            LinkType::Contact
        } else {
            LinkType::External
        }
    }

    /// Classifies a candidate into an immutable [`DiscoveredLink`]
    ///
    /// The contact, about, and map flags are computed independently of the
    /// link type, so an internal link may still be flagged as a contact link.
    pub fn classify(&self, candidate: LinkCandidate) -> DiscoveredLink {
        let url_str = candidate.url.as_str();
        let link_type = self.link_type(&candidate.url, &candidate.anchor_text);
        let is_contact = self.rules.mentions_contact(url_str, &candidate.anchor_text);
        let is_about = self.rules.mentions_about(url_str, &candidate.anchor_text);
        let is_google_maps = self.rules.is_map_url(url_str);

        DiscoveredLink {
            link_type,
            is_navigation: candidate.placement.is_navigation,
            is_footer: candidate.placement.is_footer,
            is_contact,
            is_about,
            is_google_maps,
            menu_type: candidate.placement.menu_type,
            url: candidate.url,
            anchor_text: candidate.anchor_text,
            source_page: candidate.source_page,
            depth: candidate.depth,
            context: candidate.context,
            css_classes: candidate.css_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::{MenuType, Placement};

    fn classifier() -> LinkClassifier {
        let main = Url::parse("https://www.example.com/").unwrap();
        LinkClassifier::new(&main, Arc::new(RuleSet::standard().unwrap())).unwrap()
    }

    fn candidate(url: &str, anchor: &str) -> LinkCandidate {
        LinkCandidate {
            url: Url::parse(url).unwrap(),
            anchor_text: anchor.to_string(),
            source_page: "https://www.example.com/".to_string(),
            depth: 0,
            placement: Placement::default(),
            context: String::new(),
            css_classes: String::new(),
        }
    }

    #[test]
    fn test_root_domain_strips_www() {
        assert_eq!(classifier().root_domain(), "example.com");
    }

    #[test]
    fn test_internal_ignores_www() {
        let c = classifier();
        assert_eq!(
            c.link_type(&Url::parse("https://example.com/a").unwrap(), ""),
            LinkType::Internal
        );
        assert_eq!(
            c.link_type(&Url::parse("http://WWW.example.com/b").unwrap(), ""),
            LinkType::Internal
        );
        assert_eq!(
            c.link_type(&Url::parse("https://shop.example.com/").unwrap(), ""),
            LinkType::External
        );
        assert!(c.is_internal(&Url::parse("https://www.example.com/x").unwrap()));
        assert!(!c.is_internal(&Url::parse("https://example.org/").unwrap()));
    }

    #[test]
    fn test_type_precedence() {
        let c = classifier();
        let link_type = |url: &str, anchor: &str| c.link_type(&Url::parse(url).unwrap(), anchor);

        assert_eq!(link_type("https://www.facebook.com/acme", "Contact us"), LinkType::Social);
        assert_eq!(
            link_type("https://www.google.com/maps/place/Acme", "Contact"),
            LinkType::Maps
        );
        assert_eq!(link_type("https://partner.com/contact", ""), LinkType::Contact);
        assert_eq!(link_type("https://partner.com/x", "Email our partner"), LinkType::Contact);
        assert_eq!(link_type("https://partner.com/x", "Partner"), LinkType::External);
    }

    #[test]
    fn test_flags_independent_of_type() {
        let c = classifier();
        let link = c.classify(candidate("https://example.com/contact-us", "Reach Us"));

        assert_eq!(link.link_type, LinkType::Internal);
        assert!(link.is_contact);
        assert!(!link.is_about);
        assert!(!link.is_google_maps);

        let link = c.classify(candidate("https://example.com/our-story", "Who we are"));
        assert_eq!(link.link_type, LinkType::Internal);
        assert!(link.is_about);
    }

    #[test]
    fn test_classify_carries_placement() {
        let c = classifier();
        let mut cand = candidate("https://maps.google.com/?q=acme", "Map");
        cand.placement.assign(MenuType::Footer);
        cand.depth = 3;

        let link = c.classify(cand);
        assert_eq!(link.link_type, LinkType::Maps);
        assert!(link.is_google_maps);
        assert!(link.is_footer);
        assert!(!link.is_navigation);
        assert_eq!(link.menu_type, MenuType::Footer);
        assert_eq!(link.depth, 3);
    }
}
