//! Crawler module for walking the catalog
//!
//! This module contains the core crawling logic, including:
//! - Category discovery on brand landing pages
//! - Listing pagination and per-product extraction
//! - Per-stage pacing
//! - Overall crawl coordination and snapshot persistence

mod coordinator;
mod discoverer;
mod extractor;
mod pacing;
mod paginator;

pub use coordinator::{Coordinator, CrawlReport};
pub use discoverer::CategoryDiscoverer;
pub use extractor::{Extraction, ProductExtractor};
pub use pacing::{Pacer, PacingStage};
pub use paginator::{ListingOutcome, ListingPaginator};

use crate::config::Config;
use crate::driver::HttpDriver;
use crate::extract::SiteRules;
use crate::output::XlsxSnapshotWriter;
use chrono::Utc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Compile the site's selectors and SKU patterns
/// 2. Fix the snapshot file name from today's UTC date
/// 3. Launch the HTTP page driver
/// 4. Crawl every brand, persisting after each category
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished; individual brands may still have failed
/// * `Err(CrawlerError)` - The rules did not compile or the driver did not launch
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::Config;
/// use catalog_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(Config::default()).await?;
/// println!("{} records", report.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> crate::Result<CrawlReport> {
    let rules = SiteRules::from_config(&config.site, &config.selectors)?;
    let sink = XlsxSnapshotWriter::from_config(&config.output, Utc::now().date_naive());

    tracing::info!("Snapshots will be written to {}", sink.path().display());

    let driver = HttpDriver::launch(&config.browser, &config.timeouts)?;
    let coordinator = Coordinator::new(config, rules, driver, sink);

    Ok(coordinator.run().await)
}
