use crate::catalog::Brand;
use crate::config::types::{Config, OutputConfig, SelectorConfig, SiteConfig, TimeoutConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_timeout_config(&config.timeouts)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    validate_brands(&config.brands)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)
}

/// Validates driver timeouts
fn validate_timeout_config(config: &TimeoutConfig) -> Result<(), ConfigError> {
    if config.navigation_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation-ms must be greater than 0".to_string(),
        ));
    }

    if config.wait_ms == 0 {
        return Err(ConfigError::Validation(
            "wait-ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector parses and every pattern compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    validate_selector(&config.category_anchor)?;
    validate_selector(&config.listing_item)?;
    validate_selector(&config.next_page)?;

    for selector in config
        .title
        .iter()
        .chain(&config.price)
        .chain(&config.price_fallback)
        .chain(&config.comment)
    {
        validate_selector(selector)?;
    }

    for pattern in &config.sku_patterns {
        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
    }

    if config.title.is_empty() {
        return Err(ConfigError::Validation(
            "at least one title selector is required".to_string(),
        ));
    }

    if !config.price_fallback.is_empty() && config.price_marker.is_empty() {
        return Err(ConfigError::Validation(
            "price-marker cannot be empty when price-fallback selectors are set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file-prefix cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "file-prefix must not contain path separators, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}

/// Validates brand seed entries
fn validate_brands(brands: &[Brand]) -> Result<(), ConfigError> {
    if brands.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[brand]] entry is required".to_string(),
        ));
    }

    for brand in brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand with url '{}' has an empty name",
                brand.url
            )));
        }

        validate_http_url(&format!("url of brand '{}'", brand.name), &brand.url)?;
    }

    Ok(())
}

/// Checks that a CSS selector parses
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })?;
    Ok(())
}

/// Checks that a URL parses and uses an HTTP(S) scheme
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
