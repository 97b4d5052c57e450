use crate::UrlError;
use url::Url;

/// Link target prefixes that never point at a fetchable document
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Normalizes an absolute URL string (typically a crawl seed)
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not `http` or `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment
///
/// Host lowercasing and dot-segment removal are performed by the URL parser
/// itself, so the result is stable: normalizing an already-normalized URL
/// yields the same URL.
///
/// # Examples
///
/// ```
/// use site_atlas::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

/// Resolves a link target found on a page against the page's URL
///
/// Returns an error for empty targets, in-page fragments, mail/phone/script
/// schemes, and anything that does not resolve to an `http(s)` URL.
///
/// # Arguments
///
/// * `href` - Raw attribute value from the document
/// * `base_url` - URL of the page the link was found on
pub fn normalize_link(href: &str, base_url: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if href.starts_with('#') {
        return Err(UrlError::InPage(href.to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if let Some(scheme) = SKIPPED_SCHEMES.iter().find(|s| lowered.starts_with(*s)) {
        return Err(UrlError::InvalidScheme(scheme.trim_end_matches(':').to_string()));
    }

    let url = base_url
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

fn finish(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns the matching extension if the URL path ends with one of `extensions`
///
/// Comparison is case-insensitive and looks at the path only, so query strings
/// such as `?file=a.pdf` do not trigger it.
pub fn excluded_extension<'a>(url: &Url, extensions: &'a [String]) -> Option<&'a str> {
    let path = url.path().to_ascii_lowercase();
    extensions
        .iter()
        .find(|ext| path.ends_with(&ext.to_ascii_lowercase()))
        .map(String::as_str)
}
