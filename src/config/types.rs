use crate::catalog::Brand;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Catalog-Crawler
///
/// Every section is optional; a missing section takes the values the crawler
/// was built around.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "brand", default = "default_brands")]
    pub brands: Vec<Brand>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            browser: BrowserConfig::default(),
            timeouts: TimeoutConfig::default(),
            pacing: PacingConfig::default(),
            selectors: SelectorConfig::default(),
            output: OutputConfig::default(),
            brands: default_brands(),
        }
    }
}

/// Built-in brand seed list
pub fn default_brands() -> Vec<Brand> {
    vec![Brand::new(
        "Martin Furniture",
        "https://www.afastores.com/brands/brands-martin-furniture",
    )]
}

/// Catalog site settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that relative category and product links resolve against
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.afastores.com".to_string(),
        }
    }
}

/// Page driver launch settings
///
/// These are applied before the first navigation and are otherwise opaque to
/// the crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,

    /// Whether the browser sandbox stays enabled
    pub sandbox: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "viewport-width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height")]
    pub viewport_height: u32,

    /// Value sent as the `Accept-Language` header
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            sandbox: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            viewport_width: 1366,
            viewport_height: 768,
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Upper bounds on blocking driver calls (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(rename = "navigation-ms")]
    pub navigation_ms: u64,

    #[serde(rename = "wait-ms")]
    pub wait_ms: u64,
}

impl TimeoutConfig {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
            wait_ms: 30_000,
        }
    }
}

/// Fixed delays applied at each crawl stage (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// After navigating to a brand or category page
    #[serde(rename = "after-page-load-ms")]
    pub after_page_load_ms: u64,

    /// After navigating to a product page, before reading it
    #[serde(rename = "after-product-load-ms")]
    pub after_product_load_ms: u64,

    #[serde(rename = "between-products-ms")]
    pub between_products_ms: u64,

    /// After clicking the next-page control
    #[serde(rename = "after-next-click-ms")]
    pub after_next_click_ms: u64,

    #[serde(rename = "between-categories-ms")]
    pub between_categories_ms: u64,

    #[serde(rename = "between-brands-ms")]
    pub between_brands_ms: u64,
}

impl PacingConfig {
    /// Pacing with every delay set to zero
    pub fn none() -> Self {
        Self {
            after_page_load_ms: 0,
            after_product_load_ms: 0,
            between_products_ms: 0,
            after_next_click_ms: 0,
            between_categories_ms: 0,
            between_brands_ms: 0,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            after_page_load_ms: 3000,
            after_product_load_ms: 2000,
            between_products_ms: 1000,
            after_next_click_ms: 3000,
            between_categories_ms: 2000,
            between_brands_ms: 3000,
        }
    }
}

/// CSS selectors and patterns describing the catalog's page templates
///
/// List-valued entries are fallback chains: the first rule that yields a
/// non-empty value wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Category anchors on a brand landing page
    #[serde(rename = "category-anchor")]
    pub category_anchor: String,

    /// Product title links on a listing page; also the listing-ready marker
    #[serde(rename = "listing-item")]
    pub listing_item: String,

    #[serde(rename = "next-page")]
    pub next_page: String,

    pub title: Vec<String>,

    /// Regular expressions applied to the title; capture group 1 is the SKU
    #[serde(rename = "sku-patterns")]
    pub sku_patterns: Vec<String>,

    /// Structured price elements, read as-is
    pub price: Vec<String>,

    /// Price-styled elements, accepted only when their text holds the marker
    #[serde(rename = "price-fallback")]
    pub price_fallback: Vec<String>,

    #[serde(rename = "price-marker")]
    pub price_marker: String,

    pub comment: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_anchor: "a.facets-category-cell-anchor".to_string(),
            listing_item: "a.facets-item-cell-grid-title".to_string(),
            next_page: r#".next, [class*="next"], .pagination .next, a[rel="next"]"#.to_string(),
            title: vec!["h1".to_string()],
            sku_patterns: vec![r".* - (.+)$".to_string(), r"([A-Z0-9-]+)\s*$".to_string()],
            price: vec!["#product-details-full-form span[itemprop='price']".to_string()],
            price_fallback: vec![r#"[class*="price"]"#.to_string()],
            price_marker: "$".to_string(),
            comment: vec!["#special-coupon-message-container b".to_string()],
        }
    }
}

/// Snapshot output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the workbook is written into
    pub directory: String,

    /// Workbook file name prefix; the run date and `.xlsx` are appended
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_prefix: "afastores_products".to_string(),
        }
    }
}
