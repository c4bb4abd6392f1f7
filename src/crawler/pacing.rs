//! Fixed per-stage delays between crawl actions
//!
//! Every pause the crawl makes goes through [`Pacer::wait`], keyed by the
//! stage that just happened. Intervals come from `[pacing]` in the config.

use crate::config::PacingConfig;
use std::fmt;
use std::time::Duration;

/// Points in the crawl where a pause is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacingStage {
    /// A brand landing page or the first listing page finished loading
    AfterPageLoad,

    /// A product detail page finished loading
    AfterProductLoad,

    /// One product was extracted and the next is about to start
    BetweenProducts,

    /// The next-page control was clicked
    AfterNextClick,

    /// A category finished
    BetweenCategories,

    /// A brand finished
    BetweenBrands,
}

impl PacingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfterPageLoad => "after_page_load",
            Self::AfterProductLoad => "after_product_load",
            Self::BetweenProducts => "between_products",
            Self::AfterNextClick => "after_next_click",
            Self::BetweenCategories => "between_categories",
            Self::BetweenBrands => "between_brands",
        }
    }
}

impl fmt::Display for PacingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sleeps for the configured interval of each stage
#[derive(Debug, Clone)]
pub struct Pacer {
    config: PacingConfig,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    /// A pacer that never sleeps
    pub fn disabled() -> Self {
        Self::new(PacingConfig::none())
    }

    /// Returns the interval configured for `stage`
    pub fn interval(&self, stage: PacingStage) -> Duration {
        let ms = match stage {
            PacingStage::AfterPageLoad => self.config.after_page_load_ms,
            PacingStage::AfterProductLoad => self.config.after_product_load_ms,
            PacingStage::BetweenProducts => self.config.between_products_ms,
            PacingStage::AfterNextClick => self.config.after_next_click_ms,
            PacingStage::BetweenCategories => self.config.between_categories_ms,
            PacingStage::BetweenBrands => self.config.between_brands_ms,
        };
        Duration::from_millis(ms)
    }

    /// Sleeps for the interval of `stage`; a zero interval returns immediately
    pub async fn wait(&self, stage: PacingStage) {
        let delay = self.interval(stage);
        if delay.is_zero() {
            return;
        }

        tracing::trace!("Pacing {} for {:?}", stage, delay);
        tokio::time::sleep(delay).await;
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}
