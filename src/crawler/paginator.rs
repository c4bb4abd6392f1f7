//! Listing pagination for one category
//!
//! Drives [`ListingState`] from the first listing page to the last. Every
//! product link found is handed to the [`ProductExtractor`] and its record is
//! appended to the crawl state. Pagination failures stop the category but are
//! returned rather than raised; the caller decides what an empty category
//! looks like in the export.

use crate::catalog::Category;
use crate::config::TimeoutConfig;
use crate::crawler::extractor::ProductExtractor;
use crate::crawler::pacing::{Pacer, PacingStage};
use crate::driver::{PageDriver, PageSnapshot};
use crate::extract::{next_page_target, product_links, SiteRules};
use crate::state::{CrawlState, ListingState};
use crate::url::resolve_href;
use crate::{DriverError, PaginationFailure};
use std::collections::HashSet;
use url::Url;

/// What walking one category's listing produced
#[derive(Debug, Default)]
pub struct ListingOutcome {
    /// Listing pages that loaded
    pub pages: u32,

    /// Records built from readable product pages
    pub products: u64,

    /// Product pages that could not be read
    pub blank_products: u64,

    /// Set when pagination stopped on an error instead of running out of pages
    pub failure: Option<PaginationFailure>,
}

/// Whether the listing continues after the current page
enum Advance {
    NextPage,
    LastPage,
}

/// Walks a category's paginated listing
pub struct ListingPaginator<'a> {
    rules: &'a SiteRules,
    timeouts: &'a TimeoutConfig,
    pacer: &'a Pacer,
}

impl<'a> ListingPaginator<'a> {
    pub fn new(rules: &'a SiteRules, timeouts: &'a TimeoutConfig, pacer: &'a Pacer) -> Self {
        Self {
            rules,
            timeouts,
            pacer,
        }
    }

    /// Crawls every listing page of `category`
    ///
    /// Records are appended to `state` as they are extracted, so whatever was
    /// gathered before a failure is kept.
    pub async fn paginate<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        category: &Category,
        state: &mut CrawlState,
    ) -> ListingOutcome {
        let extractor = ProductExtractor::new(&self.rules.fields, self.timeouts, self.pacer);
        let mut outcome = ListingOutcome::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut listing: Option<PageSnapshot> = None;
        let mut extracted_on_page = 0usize;
        let mut page = 1u32;
        let mut current = ListingState::LoadingPage;

        while !current.is_terminal() {
            let next = match current {
                ListingState::LoadingPage => match self.load_page(driver, category, page).await {
                    Ok(snapshot) => {
                        outcome.pages += 1;
                        visited.insert(snapshot.url.clone());
                        listing = Some(snapshot);
                        ListingState::ExtractingProducts
                    }
                    Err(source) => {
                        outcome.failure = Some(PaginationFailure {
                            category: category.name.clone(),
                            page,
                            source,
                        });
                        ListingState::Failed
                    }
                },

                ListingState::ExtractingProducts => {
                    let links = match &listing {
                        Some(snapshot) => {
                            let document = snapshot.document();
                            product_links(
                                &document,
                                self.rules.listing_item.selector(),
                                &self.rules.base,
                            )
                        }
                        None => Vec::new(),
                    };

                    tracing::info!(
                        "Page {} of '{}': {} products",
                        page,
                        category.name,
                        links.len()
                    );

                    extracted_on_page = links.len();
                    for url in &links {
                        let extraction = extractor
                            .extract(driver, url, state.brand_name(), &category.name)
                            .await;
                        if extraction.failure.is_some() {
                            outcome.blank_products += 1;
                        } else {
                            outcome.products += 1;
                        }
                        state.record(extraction.record);
                        self.pacer.wait(PacingStage::BetweenProducts).await;
                    }

                    ListingState::CheckingNextPage
                }

                ListingState::CheckingNextPage => {
                    let advanced = match &listing {
                        Some(snapshot) => {
                            self.advance(driver, snapshot, extracted_on_page > 0, &visited)
                                .await
                        }
                        None => Ok(Advance::LastPage),
                    };

                    match advanced {
                        Ok(Advance::NextPage) => {
                            page += 1;
                            ListingState::LoadingPage
                        }
                        Ok(Advance::LastPage) => ListingState::Done,
                        Err(source) => {
                            outcome.failure = Some(PaginationFailure {
                                category: category.name.clone(),
                                page,
                                source,
                            });
                            ListingState::Failed
                        }
                    }
                }

                ListingState::Done | ListingState::Failed => current,
            };

            debug_assert!(current.can_transition_to(next));
            tracing::trace!("Listing '{}': {} -> {}", category.name, current, next);
            current = next;
        }

        outcome
    }

    /// Brings a listing page up and returns its content
    ///
    /// The first page is navigated to; later pages were already reached by
    /// clicking the next control.
    async fn load_page<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        category: &Category,
        page: u32,
    ) -> Result<PageSnapshot, DriverError> {
        if page == 1 {
            driver
                .navigate(&category.url, self.timeouts.navigation())
                .await?;
            self.pacer.wait(PacingStage::AfterPageLoad).await;
        }

        driver
            .wait_for_selector(self.rules.listing_item.css(), self.timeouts.wait())
            .await?;
        driver.snapshot().await
    }

    /// Clicks through to the next listing page if there is one
    ///
    /// Product extraction moves the session onto detail pages, so the listing
    /// page is reloaded before clicking when anything was extracted from it.
    async fn advance<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        listing: &PageSnapshot,
        left_listing: bool,
        visited: &HashSet<String>,
    ) -> Result<Advance, DriverError> {
        let target = {
            let document = listing.document();
            next_page_target(&document, self.rules.next_page.selector())
        };
        let Some(href) = target else {
            return Ok(Advance::LastPage);
        };

        let destination = Url::parse(&listing.url)
            .ok()
            .and_then(|base| resolve_href(&href, &base));
        if let Some(destination) = &destination {
            if visited.contains(destination) {
                tracing::debug!("Next page {} was already visited; stopping", destination);
                return Ok(Advance::LastPage);
            }
        }

        if left_listing {
            driver
                .navigate(&listing.url, self.timeouts.navigation())
                .await?;
        }

        driver.click(self.rules.next_page.css()).await?;
        self.pacer.wait(PacingStage::AfterNextClick).await;
        Ok(Advance::NextPage)
    }
}
