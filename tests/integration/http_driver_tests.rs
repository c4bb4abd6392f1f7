//! Integration tests for the HTTP page driver
//!
//! These use wiremock to serve a small catalog and exercise the driver alone
//! and under a full crawl writing a real workbook.

use crate::common::{brand_page, listing_page, product_page};
use calamine::{open_workbook, Reader, Xlsx};
use catalog_crawler::config::{Config, PacingConfig, TimeoutConfig};
use catalog_crawler::crawler::{crawl, Coordinator, Pacer};
use catalog_crawler::driver::{HttpDriver, PageDriver};
use catalog_crawler::extract::SiteRules;
use catalog_crawler::output::{sheet_name, snapshot_file_name, XlsxSnapshotWriter};
use catalog_crawler::{Brand, DriverError};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Every sheet of a workbook with its used cells as text
fn read_sheets(path: &Path) -> Vec<(String, Vec<Vec<String>>)> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook
        .sheet_names()
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            (name, rows)
        })
        .collect()
}

fn launch() -> HttpDriver {
    HttpDriver::launch(&Default::default(), &TimeoutConfig::default()).unwrap()
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/brands/martin"))
        .respond_with(html(brand_page(&[
            ("Desks", "/martin/desks"),
            ("Bookcases and Display Cabinets", "/martin/bookcases"),
        ])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/martin/desks"))
        .and(query_param("page", "2"))
        .respond_with(html(listing_page(&["/p/desk-3"], None)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/martin/desks"))
        .respond_with(html(listing_page(
            &["/p/desk-1", "/p/desk-2", "/p/desk-1"],
            Some("?page=2"),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/martin/bookcases"))
        .respond_with(html("<html><body>No products found</body></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/desk-1"))
        .respond_with(html(product_page(
            "Writing Desk - IMTM384",
            "$499.00",
            "Free shipping",
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/desk-2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/desk-3"))
        .respond_with(html(product_page("Corner Desk IMTM390", "$650.00", "")))
        .expect(1)
        .mount(server)
        .await;
}

fn catalog_config(server: &MockServer, directory: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.brands = vec![Brand::new(
        "Martin Furniture",
        format!("{}/brands/martin", server.uri()),
    )];
    config.pacing = PacingConfig::none();
    config.timeouts = TimeoutConfig {
        navigation_ms: 5_000,
        wait_ms: 1_000,
    };
    config.output.directory = directory.path().display().to_string();
    config
}

#[tokio::test]
async fn test_navigate_and_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brands/martin"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(html("<html><body><h1>Martin Furniture</h1></body></html>"))
        .mount(&server)
        .await;

    let mut driver = launch();
    let target = format!("{}/brands/martin", server.uri());
    driver.navigate(&target, Duration::from_secs(5)).await.unwrap();

    let snapshot = driver.snapshot().await.unwrap();
    assert_eq!(snapshot.url, target);
    assert!(snapshot.html.contains("Martin Furniture"));
    assert!(driver
        .wait_for_selector("h1", Duration::from_secs(1))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_error_status_is_a_navigation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut driver = launch();
    let result = driver
        .navigate(&format!("{}/missing", server.uri()), Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(DriverError::HttpStatus { status: 404, .. })));
    assert!(matches!(driver.snapshot().await, Err(DriverError::NoPageLoaded)));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html></html>").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut driver = launch();
    let result = driver
        .navigate(&format!("{}/slow", server.uri()), Duration::from_millis(200))
        .await;

    assert!(matches!(result, Err(DriverError::NavigationTimeout { .. })));
}

#[tokio::test]
async fn test_missing_marker_fails_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html><body><p>Loading</p></body></html>"))
        .mount(&server)
        .await;

    let mut driver = launch();
    driver
        .navigate(&format!("{}/martin/desks", server.uri()), Duration::from_secs(5))
        .await
        .unwrap();

    let result = driver
        .wait_for_selector("a.facets-item-cell-grid-title", Duration::from_secs(1))
        .await;
    assert!(matches!(result, Err(DriverError::MarkerTimeout { .. })));
}

#[tokio::test]
async fn test_click_follows_relative_href() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/martin/desks"))
        .and(query_param("page", "2"))
        .respond_with(html("<html><body><h1>Page two</h1></body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/martin/desks"))
        .respond_with(html(listing_page(&[], Some("?page=2"))))
        .mount(&server)
        .await;

    let mut driver = launch();
    driver
        .navigate(&format!("{}/martin/desks", server.uri()), Duration::from_secs(5))
        .await
        .unwrap();
    driver.click("a.pagination-next").await.unwrap();

    let snapshot = driver.snapshot().await.unwrap();
    assert_eq!(snapshot.url, format!("{}/martin/desks?page=2", server.uri()));
    assert!(snapshot.html.contains("Page two"));

    let missing = driver.click("a.pagination-next").await;
    assert!(matches!(missing, Err(DriverError::NothingToClick { .. })));
}

#[tokio::test]
async fn test_closed_session_refuses_navigation() {
    let mut driver = launch();
    driver.close().await.unwrap();

    let result = driver
        .navigate("https://www.afastores.com/", Duration::from_secs(1))
        .await;
    assert!(matches!(result, Err(DriverError::SessionClosed)));
}

#[tokio::test]
async fn test_full_crawl_writes_workbook() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let output = TempDir::new().unwrap();

    let config = catalog_config(&server, &output);
    let rules = SiteRules::from_config(&config.site, &config.selectors).unwrap();
    let driver = HttpDriver::launch(&config.browser, &config.timeouts).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let sink = XlsxSnapshotWriter::new(output.path(), &config.output.file_prefix, date);

    let report = Coordinator::new(config, rules, driver, sink)
        .with_pacer(Pacer::disabled())
        .run()
        .await;

    let records = report.results.records();
    let skus: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.category.as_str(), r.sku.as_str()))
        .collect();
    assert_eq!(
        skus,
        vec![
            ("Desks", "IMTM384"),
            ("Desks", ""),
            ("Desks", "IMTM390"),
            ("Bookcases and Display Cabinets", ""),
        ]
    );
    assert_eq!(records[0].comment, "Free shipping");
    assert_eq!(records[2].price, "$650.00");

    assert_eq!(report.stats.listing_pages, 2);
    assert_eq!(report.stats.products, 2);
    assert_eq!(report.stats.blank_products, 1);
    assert_eq!(report.stats.placeholders, 1);
    assert_eq!(report.stats.snapshots_written, 2);

    let workbook = output
        .path()
        .join(snapshot_file_name("afastores_products", date));
    let sheets = read_sheets(&workbook);

    let long_name = sheet_name("Martin Furniture - Bookcases and Display Cabinets");
    assert_eq!(long_name, "Martin Furniture - Bookcases an");
    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Martin Furniture - Desks", long_name.as_str()]);

    let header = vec!["SKU", "Selling Price", "Comment"];
    assert_eq!(
        sheets[0].1,
        vec![
            header.clone(),
            vec!["IMTM384", "$499.00", "Free shipping"],
            vec!["", "", ""],
            vec!["IMTM390", "$650.00", ""],
        ]
    );
    // The placeholder row has no cells to write
    assert_eq!(sheets[1].1, vec![header]);
}

#[tokio::test]
async fn test_crawl_entry_point_writes_dated_workbook() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let output = TempDir::new().unwrap();

    let report = crawl(catalog_config(&server, &output)).await.unwrap();
    assert_eq!(report.stats.brands, 1);
    assert_eq!(report.stats.brand_failures, 0);

    let files: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("afastores_products_"));
    assert!(files[0].ends_with(".xlsx"));
}

#[tokio::test]
async fn test_crawl_rejects_invalid_selectors_before_launch() {
    let mut config = Config::default();
    config.selectors.listing_item = "a[".to_string();

    let result = crawl(config).await;
    assert!(matches!(
        result,
        Err(catalog_crawler::CrawlerError::Config(_))
    ));
}
