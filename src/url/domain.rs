use url::Url;

/// Extracts the site domain used for same-site comparison
///
/// The host is lowercased, a leading `www.` is stripped, and an explicit
/// non-default port is kept so that two servers on one host are treated as
/// different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_atlas::url::site_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(site_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(site_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn site_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let host = strip_www(&host);

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Removes a single leading `www.` label
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Checks a bare domain against a configured pattern
///
/// `facebook.com` matches only itself; `*.facebook.com` matches
/// `facebook.com` and any subdomain of it. Both sides are compared without
/// a leading `www.` and without a port.
pub fn matches_domain_pattern(pattern: &str, domain: &str) -> bool {
    let domain = domain.split(':').next().unwrap_or(domain);
    let domain = strip_www(domain);

    match pattern.strip_prefix("*.") {
        Some(base) => {
            domain == base
                || (domain.len() > base.len()
                    && domain.ends_with(base)
                    && domain.as_bytes()[domain.len() - base.len() - 1] == b'.')
        }
        None => domain == strip_www(pattern),
    }
}
