//! URL handling for catalog links
//!
//! Category and product anchors frequently carry site-relative hrefs; these
//! helpers turn them into absolute URLs against a base.

use ::url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Absolute hrefs are kept as they are; anything else is joined onto `base`.
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://www.afastores.com").unwrap();
/// assert_eq!(
///     resolve_href("/martin-furniture/bookcases", &base),
///     Some("https://www.afastores.com/martin-furniture/bookcases".to_string())
/// );
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Parses the origin that site-relative hrefs resolve against
pub fn parse_base(base_url: &str) -> Result<Url, ::url::ParseError> {
    Url::parse(base_url)
}
