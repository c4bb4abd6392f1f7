//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences the whole run:
//! - Brands in configured order, each one discovered for categories
//! - Categories in page order, each one paginated and extracted
//! - A full snapshot persisted after every category
//! - The driver session released once every brand has been tried
//!
//! Failures are contained at the smallest scope that can absorb them. A bad
//! product page becomes a blank record, a broken listing ends its category,
//! and a brand whose categories cannot be discovered is skipped.

use crate::catalog::{Brand, Category};
use crate::config::Config;
use crate::crawler::discoverer::CategoryDiscoverer;
use crate::crawler::pacing::{Pacer, PacingStage};
use crate::crawler::paginator::ListingPaginator;
use crate::driver::PageDriver;
use crate::extract::SiteRules;
use crate::output::{self, ResultSet, RunStatistics, SnapshotSink};
use crate::state::CrawlState;
use crate::DiscoveryFailure;

/// Everything a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    pub stats: RunStatistics,
    pub results: ResultSet,
}

/// Main crawler coordinator structure
///
/// Owns the page driver session, the snapshot sink and the crawl state for
/// the length of one run.
pub struct Coordinator<D, S> {
    config: Config,
    rules: SiteRules,
    driver: D,
    sink: S,
    pacer: Pacer,
    state: CrawlState,
    stats: RunStatistics,
}

impl<D: PageDriver, S: SnapshotSink> Coordinator<D, S> {
    /// Creates a coordinator over an already launched driver
    ///
    /// Pacing intervals are taken from `config.pacing`.
    pub fn new(config: Config, rules: SiteRules, driver: D, sink: S) -> Self {
        let pacer = Pacer::new(config.pacing.clone());

        Self {
            config,
            rules,
            driver,
            sink,
            pacer,
            state: CrawlState::new(),
            stats: RunStatistics::new(),
        }
    }

    /// Replaces the pacer built from configuration
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Runs the crawl over every configured brand
    ///
    /// Nothing inside a brand can stop the run. The driver is closed before
    /// returning whether or not any brand succeeded.
    pub async fn run(mut self) -> CrawlReport {
        let brands = self.config.brands.clone();
        let start_time = std::time::Instant::now();

        tracing::info!("Starting crawl of {} brands", brands.len());

        for brand in &brands {
            if let Err(failure) = self.crawl_brand(brand).await {
                self.stats.brand_failures += 1;
                tracing::error!("Error scraping brand {}: {}", brand.name, failure);
            }
            self.pacer.wait(PacingStage::BetweenBrands).await;
        }

        if let Err(e) = self.driver.close().await {
            tracing::warn!("Failed to close page driver: {}", e);
        }

        tracing::info!(
            "Scraping completed: {} records from {} categories in {:?}",
            self.state.results().len(),
            self.stats.categories,
            start_time.elapsed()
        );

        CrawlReport {
            stats: self.stats,
            results: self.state.into_results(),
        }
    }

    /// Discovers a brand's categories and crawls each of them
    async fn crawl_brand(&mut self, brand: &Brand) -> Result<(), DiscoveryFailure> {
        self.stats.brands += 1;
        self.state.begin_brand(brand);

        tracing::info!("Scraping brand {} ({})", brand.name, brand.url);

        let discoverer = CategoryDiscoverer::new(&self.rules, &self.config.timeouts, &self.pacer);
        let categories = discoverer.discover(&mut self.driver, brand).await?;

        tracing::info!("Found {} categories for {}", categories.len(), brand.name);

        for category in &categories {
            self.crawl_category(category).await;
            self.pacer.wait(PacingStage::BetweenCategories).await;
        }

        Ok(())
    }

    /// Paginates one category, closes it out and persists a snapshot
    async fn crawl_category(&mut self, category: &Category) {
        self.stats.categories += 1;
        self.state.begin_category(category);

        tracing::info!("Scraping category '{}' ({})", category.name, category.url);

        let paginator = ListingPaginator::new(&self.rules, &self.config.timeouts, &self.pacer);
        let outcome = paginator
            .paginate(&mut self.driver, category, &mut self.state)
            .await;

        self.stats.listing_pages += u64::from(outcome.pages);
        self.stats.products += outcome.products;
        self.stats.blank_products += outcome.blank_products;

        if let Some(failure) = &outcome.failure {
            self.stats.category_failures += 1;
            tracing::error!("Error scraping category '{}': {}", category.name, failure);
        }

        if self.state.finish_category() {
            self.stats.placeholders += 1;
            tracing::info!(
                "No products recorded for '{}'; added an empty row",
                category.name
            );
        }

        self.persist();
    }

    /// Writes the snapshot; a failed write is logged and the crawl goes on
    fn persist(&mut self) {
        match output::persist(self.state.results(), &mut self.sink) {
            Ok(path) => {
                self.stats.snapshots_written += 1;
                tracing::info!("Excel file updated: {}", path.display());
            }
            Err(e) => {
                self.stats.snapshot_failures += 1;
                tracing::error!("Failed to write snapshot: {}", e);
            }
        }
    }
}
