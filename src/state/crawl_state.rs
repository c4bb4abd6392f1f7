use crate::catalog::{Brand, Category, ProductRecord};
use crate::output::ResultSet;

/// Tracks where the crawl is and what it has produced
///
/// Owned by the coordinator and lent to each stage. Records are appended to
/// the run-wide result set and counted against the current category, which is
/// how an empty category is detected once its listing ends.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Brand currently being crawled
    brand: Option<Brand>,

    /// Category currently being paginated
    category: Option<Category>,

    /// Records appended since the current category began
    category_records: usize,

    /// Every record of the run, in append order
    results: ResultSet,
}

impl CrawlState {
    /// Creates a new, empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a brand
    pub fn begin_brand(&mut self, brand: &Brand) {
        self.brand = Some(brand.clone());
        self.category = None;
        self.category_records = 0;
    }

    /// Marks the start of a category within the current brand
    pub fn begin_category(&mut self, category: &Category) {
        self.category = Some(category.clone());
        self.category_records = 0;
    }

    pub fn current_brand(&self) -> Option<&Brand> {
        self.brand.as_ref()
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Name of the current brand, or an empty string outside a brand
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map(|b| b.name.as_str()).unwrap_or("")
    }

    /// Name of the current category, or an empty string outside a category
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// Appends a record to the run and counts it against the current category
    pub fn record(&mut self, record: ProductRecord) {
        self.results.append(record);
        self.category_records += 1;
    }

    /// Number of records appended since the current category began
    pub fn category_record_count(&self) -> usize {
        self.category_records
    }

    /// Closes the current category
    ///
    /// A category that produced no records gets a placeholder so it still
    /// appears in the export.
    ///
    /// # Returns
    ///
    /// `true` if a placeholder was appended
    pub fn finish_category(&mut self) -> bool {
        let needs_placeholder = self.category.is_some() && self.category_records == 0;

        if needs_placeholder {
            let placeholder = ProductRecord::placeholder(self.brand_name(), self.category_name());
            self.results.append(placeholder);
        }

        self.category = None;
        self.category_records = 0;
        needs_placeholder
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }
}
