//! Catalog-Crawler: a paced brand → category → product catalog crawler
//!
//! This crate walks a furniture retailer's catalog one brand at a time,
//! discovers each brand's categories, follows every category's paginated
//! listing, extracts SKU/price/promotion fields from each product page and
//! rewrites a grouped workbook snapshot after every category.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod driver;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised by a page driver session
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch page driver: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Marker '{marker}' did not appear within {timeout_ms}ms")]
    MarkerTimeout { marker: String, timeout_ms: u64 },

    #[error("Nothing to click for '{marker}'")]
    NothingToClick { marker: String },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("No page is loaded")]
    NoPageLoaded,

    #[error("Page driver session is closed")]
    SessionClosed,
}

/// A brand landing page never produced its category listing
#[derive(Debug, Error)]
#[error("category discovery failed for {url}: {source}")]
pub struct DiscoveryFailure {
    pub url: String,
    #[source]
    pub source: DriverError,
}

/// A listing page could not be loaded, read or advanced
#[derive(Debug, Error)]
#[error("pagination of '{category}' stopped on page {page}: {source}")]
pub struct PaginationFailure {
    pub category: String,
    pub page: u32,
    #[source]
    pub source: DriverError,
}

/// A product detail page could not be loaded or read
#[derive(Debug, Error)]
#[error("extraction failed for {url}: {source}")]
pub struct ExtractionFailure {
    pub url: String,
    #[source]
    pub source: DriverError,
}

/// Result type alias for Catalog-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

// Re-export commonly used types
pub use catalog::{Brand, Category, ProductRecord};
pub use config::Config;
pub use state::{CrawlState, ListingState};
