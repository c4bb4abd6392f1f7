//! Run statistics
//!
//! Counters collected by the coordinator while it crawls, printed once the
//! run is over.

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Brands attempted
    pub brands: u64,

    /// Brands whose landing page never produced a category listing
    pub brand_failures: u64,

    /// Categories attempted, duplicates included
    pub categories: u64,

    /// Categories whose pagination stopped on an error
    pub category_failures: u64,

    /// Listing pages loaded
    pub listing_pages: u64,

    /// Product records produced from a detail page
    pub products: u64,

    /// Product pages that could not be read and became blank records
    pub blank_products: u64,

    /// Placeholders appended for categories with no records
    pub placeholders: u64,

    /// Snapshots written
    pub snapshots_written: u64,

    /// Snapshot writes that failed
    pub snapshot_failures: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of product pages that yielded their fields, as a percentage
    pub fn extraction_rate(&self) -> f64 {
        let attempted = self.products + self.blank_products;
        if attempted == 0 {
            return 0.0;
        }
        ((attempted - self.blank_products) as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Brands:");
    println!("  Attempted: {}", stats.brands);
    println!("  Discovery failures: {}", stats.brand_failures);
    println!();

    println!("Categories:");
    println!("  Attempted: {}", stats.categories);
    println!("  Stopped on error: {}", stats.category_failures);
    println!("  Empty (placeholder row): {}", stats.placeholders);
    println!("  Listing pages loaded: {}", stats.listing_pages);
    println!();

    println!("Products:");
    println!("  Extracted: {}", stats.products);
    println!("  Unreadable (blank row): {}", stats.blank_products);
    println!();

    println!("Snapshots:");
    println!("  Written: {}", stats.snapshots_written);
    if stats.snapshot_failures > 0 {
        println!("  Failed: {}", stats.snapshot_failures);
    }
    println!();

    println!(
        "Extraction Rate: {:.1}% ({} / {} product pages read)",
        stats.extraction_rate(),
        stats.products,
        stats.products + stats.blank_products
    );
}
