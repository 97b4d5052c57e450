//! URL handling module for Site-Atlas
//!
//! This module provides link resolution and normalization, site-domain
//! extraction, and domain pattern matching.

mod domain;
mod normalize;

pub use domain::{matches_domain_pattern, site_domain, strip_www};
pub use normalize::{excluded_extension, normalize_link, normalize_url};

use url::Url;

/// Returns the root URL (`scheme://host[:port]/`) of the site a URL belongs to
pub fn site_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root() {
        let url = Url::parse("https://example.com/a/b?c=d#e").unwrap();
        assert_eq!(site_root(&url).as_str(), "https://example.com/");
    }
}
