//! Link extraction for brand and listing pages

use crate::catalog::Category;
use crate::extract::rules::element_text;
use crate::url::resolve_href;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts category anchors from a brand landing page
///
/// Every matching anchor yields one category, in page order. Duplicates are
/// kept: a category linked twice is crawled twice. An href that does not
/// resolve is kept as written (empty when missing), so navigating to it fails
/// and the category still shows up in the export.
pub fn category_links(document: &Html, anchor: &Selector, base: &Url) -> Vec<Category> {
    document
        .select(anchor)
        .map(|element| {
            let href = element.value().attr("href").unwrap_or_default();
            let url = resolve_href(href, base).unwrap_or_else(|| href.trim().to_string());
            Category::new(element_text(element), url)
        })
        .collect()
}

/// Extracts the product detail links of one listing page
///
/// Links are deduplicated within the page, keeping the order of first
/// appearance.
pub fn product_links(document: &Html, item: &Selector, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(item) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_href(href, base) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}

/// Decides whether the listing has a next page
///
/// The first element matching `next` must exist, must not carry the
/// `disabled` class and must hold a non-empty `href`. Returns that href.
pub fn next_page_target(document: &Html, next: &Selector) -> Option<String> {
    let control = document.select(next).next()?;

    if control.value().classes().any(|class| class == "disabled") {
        return None;
    }

    control
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}
