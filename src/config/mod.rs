//! Configuration module for Catalog-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a built-in default, so running without a file crawls the
//! built-in brand list with the site's known selectors and pacing.
//!
//! # Example
//!
//! ```no_run
//! use catalog_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling {} brands", config.brands.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_brands, BrowserConfig, Config, OutputConfig, PacingConfig, SelectorConfig,
    SiteConfig, TimeoutConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
