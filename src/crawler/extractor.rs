//! Product detail extraction
//!
//! [`ProductExtractor::extract`] always yields a record. A detail page that
//! cannot be loaded or read becomes a blank record carrying only its brand and
//! category, so pagination keeps going through the rest of the listing.

use crate::catalog::{ExtractedFields, ProductRecord};
use crate::config::TimeoutConfig;
use crate::crawler::pacing::{Pacer, PacingStage};
use crate::driver::PageDriver;
use crate::extract::{extract_fields, FieldRules};
use crate::{DriverError, ExtractionFailure};

/// Outcome of one detail page
#[derive(Debug)]
pub struct Extraction {
    pub record: ProductRecord,

    /// Why the record is blank, if the page could not be read
    pub failure: Option<ExtractionFailure>,
}

/// Loads product pages and applies the field rules
pub struct ProductExtractor<'a> {
    rules: &'a FieldRules,
    timeouts: &'a TimeoutConfig,
    pacer: &'a Pacer,
}

impl<'a> ProductExtractor<'a> {
    pub fn new(rules: &'a FieldRules, timeouts: &'a TimeoutConfig, pacer: &'a Pacer) -> Self {
        Self {
            rules,
            timeouts,
            pacer,
        }
    }

    /// Extracts one product, never failing
    pub async fn extract<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
        brand: &str,
        category: &str,
    ) -> Extraction {
        match self.read(driver, url).await {
            Ok(fields) => {
                tracing::debug!(
                    "Extracted '{}' (sku: '{}') from {}",
                    fields.title,
                    fields.sku,
                    url
                );
                Extraction {
                    record: ProductRecord::from_fields(brand, category, fields),
                    failure: None,
                }
            }
            Err(failure) => {
                tracing::warn!("Error scraping product {}: {}", url, failure.source);
                Extraction {
                    record: ProductRecord::placeholder(brand, category),
                    failure: Some(failure),
                }
            }
        }
    }

    async fn read<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> Result<ExtractedFields, ExtractionFailure> {
        let fail = |source: DriverError| ExtractionFailure {
            url: url.to_string(),
            source,
        };

        driver
            .navigate(url, self.timeouts.navigation())
            .await
            .map_err(fail)?;
        self.pacer.wait(PacingStage::AfterProductLoad).await;
        let snapshot = driver.snapshot().await.map_err(fail)?;

        Ok(extract_fields(&snapshot, self.rules))
    }
}
