//! Declarative fallback rules for product fields
//!
//! Each field owns an ordered list of rules. [`first_match`] walks the list and
//! keeps the first non-empty value, so new fallbacks are added by extending a
//! list rather than by touching control flow.

use crate::config::SelectorConfig;
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// A rule that reads text out of a page
#[derive(Debug, Clone)]
pub enum TextRule {
    /// Trimmed text of the first element matching the selector
    First(Selector),

    /// Trimmed text of the first matching element whose text contains `needle`
    FirstContaining { selector: Selector, needle: String },
}

impl TextRule {
    /// Applies the rule to a parsed page
    pub fn apply(&self, document: &Html) -> Option<String> {
        match self {
            Self::First(selector) => document.select(selector).next().map(element_text),
            Self::FirstContaining { selector, needle } => document
                .select(selector)
                .map(element_text)
                .find(|text| text.contains(needle.as_str())),
        }
    }
}

/// A rule that derives the SKU from the product title
#[derive(Debug, Clone)]
pub struct SkuRule {
    pattern: Regex,
}

impl SkuRule {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Returns capture group 1 (or the whole match), trimmed
    pub fn apply(&self, title: &str) -> Option<String> {
        let captures = self.pattern.captures(title)?;
        let matched = captures.get(1).or_else(|| captures.get(0))?;
        Some(matched.as_str().trim().to_string())
    }
}

/// Ordered fallback chains for every extracted field
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub title: Vec<TextRule>,
    pub sku: Vec<SkuRule>,
    pub price: Vec<TextRule>,
    pub comment: Vec<TextRule>,
}

impl FieldRules {
    /// Compiles the rule tables described by the selector configuration
    ///
    /// Structured price selectors come before the marker-filtered fallbacks.
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let title = config
            .title
            .iter()
            .map(|s| parse_selector(s).map(TextRule::First))
            .collect::<Result<Vec<_>, _>>()?;

        let sku = config
            .sku_patterns
            .iter()
            .map(|p| SkuRule::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut price = config
            .price
            .iter()
            .map(|s| parse_selector(s).map(TextRule::First))
            .collect::<Result<Vec<_>, _>>()?;
        for selector in &config.price_fallback {
            price.push(TextRule::FirstContaining {
                selector: parse_selector(selector)?,
                needle: config.price_marker.clone(),
            });
        }

        let comment = config
            .comment
            .iter()
            .map(|s| parse_selector(s).map(TextRule::First))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title,
            sku,
            price,
            comment,
        })
    }
}

/// Evaluates rules in order and returns the first non-empty result
///
/// Returns an empty string when no rule produces a value.
pub fn first_match<R>(rules: &[R], mut apply: impl FnMut(&R) -> Option<String>) -> String {
    rules
        .iter()
        .find_map(|rule| apply(rule).filter(|value| !value.is_empty()))
        .unwrap_or_default()
}

/// Collects an element's descendant text, trimmed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses a CSS selector, mapping failures to a configuration error
pub fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
