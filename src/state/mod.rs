//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ListingState`: where the paginator is within one category's listing
//! - `CrawlState`: current brand and category plus every record produced so far

mod crawl_state;
mod listing_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use listing_state::ListingState;
