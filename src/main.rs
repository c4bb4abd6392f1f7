//! Catalog-Crawler main entry point
//!
//! This is the command-line interface for the Catalog-Crawler.

use catalog_crawler::config::{load_config_with_hash, Config};
use catalog_crawler::crawler::{crawl, Pacer, PacingStage};
use catalog_crawler::extract::SiteRules;
use catalog_crawler::output::{print_statistics, snapshot_file_name};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Crawler: a paced brand catalog crawler
///
/// Catalog-Crawler walks each configured brand's categories and listing
/// pages, extracts SKU, price and promotion text from every product page,
/// and rewrites a dated workbook with one sheet per brand and category after
/// each category finishes.
#[derive(Parser, Debug)]
#[command(name = "catalog-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A paced brand catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load(path)?,
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Loads and validates the configuration file
fn load(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_crawler=info,warn"),
            1 => EnvFilter::new("catalog_crawler=debug,info"),
            2 => EnvFilter::new("catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved plan without launching a driver
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Selectors and patterns must compile exactly as a crawl would compile them
    SiteRules::from_config(&config.site, &config.selectors)?;

    println!("=== Catalog-Crawler Dry Run ===\n");

    println!("Site: {}", config.site.base_url);

    println!("\nBrowser:");
    println!("  User agent: {}", config.browser.user_agent);
    println!("  Accept-Language: {}", config.browser.accept_language);
    println!(
        "  Viewport: {}x{} (headless: {})",
        config.browser.viewport_width, config.browser.viewport_height, config.browser.headless
    );

    println!("\nTimeouts:");
    println!("  Navigation: {}ms", config.timeouts.navigation_ms);
    println!("  Marker wait: {}ms", config.timeouts.wait_ms);

    println!("\nPacing:");
    let pacer = Pacer::new(config.pacing.clone());
    for stage in [
        PacingStage::AfterPageLoad,
        PacingStage::AfterProductLoad,
        PacingStage::BetweenProducts,
        PacingStage::AfterNextClick,
        PacingStage::BetweenCategories,
        PacingStage::BetweenBrands,
    ] {
        println!("  {}: {:?}", stage, pacer.interval(stage));
    }

    let selectors = &config.selectors;
    println!("\nSelectors:");
    println!("  Category anchor: {}", selectors.category_anchor);
    println!("  Listing item: {}", selectors.listing_item);
    println!("  Next page: {}", selectors.next_page);
    println!("  Title: {}", selectors.title.join(" | "));
    println!("  SKU patterns: {}", selectors.sku_patterns.join(" | "));
    println!(
        "  Price: {} | {} (containing '{}')",
        selectors.price.join(" | "),
        selectors.price_fallback.join(" | "),
        selectors.price_marker
    );
    println!("  Comment: {}", selectors.comment.join(" | "));

    println!("\nBrands ({}):", config.brands.len());
    for brand in &config.brands {
        println!("  - {} ({})", brand.name, brand.url);
    }

    let snapshot = Path::new(&config.output.directory).join(snapshot_file_name(
        &config.output.file_prefix,
        Utc::now().date_naive(),
    ));
    println!("\nSnapshot: {}", snapshot.display());

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} brands", config.brands.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Brands: {}", config.brands.len());

    match crawl(config).await {
        Ok(report) => {
            tracing::info!("Scraping completed!");
            print_statistics(&report.stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
