//! Category discovery on a brand landing page

use crate::catalog::{Brand, Category};
use crate::config::TimeoutConfig;
use crate::crawler::pacing::{Pacer, PacingStage};
use crate::driver::PageDriver;
use crate::extract::{category_links, SiteRules};
use crate::{DiscoveryFailure, DriverError};

/// Reads the category listing of a brand
pub struct CategoryDiscoverer<'a> {
    rules: &'a SiteRules,
    timeouts: &'a TimeoutConfig,
    pacer: &'a Pacer,
}

impl<'a> CategoryDiscoverer<'a> {
    pub fn new(rules: &'a SiteRules, timeouts: &'a TimeoutConfig, pacer: &'a Pacer) -> Self {
        Self {
            rules,
            timeouts,
            pacer,
        }
    }

    /// Loads the brand landing page and returns its categories
    ///
    /// Categories keep page order. The same category linked twice is returned
    /// twice and will be crawled twice.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryFailure`] if the page cannot be loaded or the
    /// category anchors never appear.
    pub async fn discover<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        brand: &Brand,
    ) -> Result<Vec<Category>, DiscoveryFailure> {
        self.load(driver, &brand.url)
            .await
            .map_err(|source| DiscoveryFailure {
                url: brand.url.clone(),
                source,
            })
    }

    async fn load<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> Result<Vec<Category>, DriverError> {
        driver.navigate(url, self.timeouts.navigation()).await?;
        self.pacer.wait(PacingStage::AfterPageLoad).await;
        driver
            .wait_for_selector(self.rules.category_anchor.css(), self.timeouts.wait())
            .await?;

        let snapshot = driver.snapshot().await?;
        let document = snapshot.document();
        let categories = category_links(
            &document,
            self.rules.category_anchor.selector(),
            &self.rules.base,
        );

        tracing::debug!("Found {} category links on {}", categories.len(), url);
        Ok(categories)
    }
}
