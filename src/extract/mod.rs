//! Driver-independent extraction from page snapshots
//!
//! Everything here is pure: functions take an already-fetched
//! [`PageSnapshot`] and return plain data, so template handling can be tested
//! against literal HTML.

mod links;
mod rules;

pub use links::{category_links, next_page_target, product_links};
pub use rules::{element_text, first_match, parse_selector, FieldRules, SkuRule, TextRule};

use crate::catalog::ExtractedFields;
use crate::config::{SelectorConfig, SiteConfig};
use crate::driver::PageSnapshot;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// A CSS selector kept alongside its source text
///
/// The source text is what gets handed to the page driver; the compiled
/// selector is what snapshot extraction uses.
#[derive(Debug, Clone)]
pub struct Marker {
    css: String,
    selector: Selector,
}

impl Marker {
    pub fn parse(css: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            css: css.to_string(),
            selector: parse_selector(css)?,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Everything the crawl needs to know about the site's page templates
#[derive(Debug, Clone)]
pub struct SiteRules {
    /// Origin that relative hrefs resolve against
    pub base: Url,
    pub category_anchor: Marker,
    pub listing_item: Marker,
    pub next_page: Marker,
    pub fields: FieldRules,
}

impl SiteRules {
    /// Compiles selectors and patterns from configuration
    pub fn from_config(site: &SiteConfig, selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        let base = crate::url::parse_base(&site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        Ok(Self {
            base,
            category_anchor: Marker::parse(&selectors.category_anchor)?,
            listing_item: Marker::parse(&selectors.listing_item)?,
            next_page: Marker::parse(&selectors.next_page)?,
            fields: FieldRules::from_config(selectors)?,
        })
    }
}

/// Extracts product fields from a detail page snapshot
///
/// The title feeds the SKU rules; price and comment are read from the page.
/// Fields whose rules all come up empty are left blank.
pub fn extract_fields(snapshot: &PageSnapshot, rules: &FieldRules) -> ExtractedFields {
    let document = snapshot.document();

    let title = first_match(&rules.title, |rule| rule.apply(&document));
    let sku = first_match(&rules.sku, |rule| rule.apply(&title));
    let price = first_match(&rules.price, |rule| rule.apply(&document));
    let comment = first_match(&rules.comment, |rule| rule.apply(&document));

    ExtractedFields {
        title,
        sku,
        price,
        comment,
    }
}
