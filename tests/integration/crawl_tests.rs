//! Integration tests for the crawler
//!
//! These run the coordinator end to end over a scripted in-memory site.

use crate::common::*;
use catalog_crawler::output::{sheet_name, Snapshot};
use catalog_crawler::{Brand, ProductRecord};

fn records_for<'a>(records: &'a [ProductRecord], category: &str) -> Vec<&'a ProductRecord> {
    records.iter().filter(|r| r.category == category).collect()
}

#[tokio::test]
async fn test_every_category_gets_a_row_under_total_extraction_failure() {
    let driver = ScriptedDriver::new()
        .page(
            martin().url,
            brand_page(&[("Desks", "/martin/desks"), ("Bookcases", "/martin/bookcases")]),
        )
        .page(
            url("/martin/desks"),
            listing_page(&["/p/desk-1", "/p/desk-2"], None),
        )
        .failing(url("/p/desk-1"))
        .failing(url("/p/desk-2"))
        // Listing never shows its items
        .page(url("/martin/bookcases"), "<html><body>Loading...</body></html>");
    let log = driver.log();

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;
    let records = report.results.records();

    let desks = records_for(records, "Desks");
    assert_eq!(desks.len(), 2);
    assert!(desks.iter().all(|r| r.is_placeholder()));
    assert!(desks.iter().all(|r| r.brand == "Martin Furniture"));

    let bookcases = records_for(records, "Bookcases");
    assert_eq!(bookcases.len(), 1);
    assert!(bookcases[0].is_placeholder());

    assert_eq!(report.stats.blank_products, 2);
    assert_eq!(report.stats.placeholders, 1);
    assert_eq!(report.stats.category_failures, 1);
    assert!(log.lock().unwrap().closed);
}

#[tokio::test]
async fn test_duplicate_product_links_are_extracted_once() {
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Desks", "/martin/desks")]))
        .page(
            url("/martin/desks"),
            listing_page(&["/p/desk-1", "/p/desk-1", "/p/desk-2", "/p/desk-1"], None),
        )
        .page(
            url("/p/desk-1"),
            product_page("Writing Desk - IMTM384", "$499.00", ""),
        )
        .page(
            url("/p/desk-2"),
            product_page("Corner Desk - IMTM385", "$599.00", ""),
        );
    let log = driver.log();

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    let log = log.lock().unwrap();
    assert_eq!(log.navigation_count(&url("/p/desk-1")), 1);
    assert_eq!(log.navigation_count(&url("/p/desk-2")), 1);

    let skus: Vec<&str> = report.results.records().iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(skus, vec!["IMTM384", "IMTM385"]);
}

#[tokio::test]
async fn test_duplicate_category_links_are_crawled_each_time() {
    // Known limitation: category links are not deduplicated
    let driver = ScriptedDriver::new()
        .page(
            martin().url,
            brand_page(&[("Desks", "/martin/desks"), ("Desks", "/martin/desks")]),
        )
        .page(url("/martin/desks"), listing_page(&["/p/desk-1"], None))
        .page(
            url("/p/desk-1"),
            product_page("Writing Desk - IMTM384", "$499.00", ""),
        );
    let log = driver.log();

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    assert_eq!(log.lock().unwrap().navigation_count(&url("/martin/desks")), 2);
    assert_eq!(report.stats.categories, 2);
    assert_eq!(report.results.len(), 2);

    let groups = report.results.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].records.len(), 2);
}

#[tokio::test]
async fn test_category_without_usable_href_gets_a_placeholder() {
    let brand_html = r##"<html><body><div class="facets">
        <a class="facets-category-cell-anchor">Clearance</a>
        <a class="facets-category-cell-anchor" href="#">Sale</a>
        <a class="facets-category-cell-anchor" href="/martin/desks">Desks</a>
    </div></body></html>"##;
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_html)
        .page(url("/martin/desks"), listing_page(&["/p/desk-1"], None))
        .page(
            url("/p/desk-1"),
            product_page("Writing Desk - IMTM384", "$499.00", ""),
        );
    let sink = RecordingSink::new();

    let report = run(config_for(vec![martin()]), driver, sink.clone()).await;
    let records = report.results.records();

    let clearance = records_for(records, "Clearance");
    assert_eq!(clearance.len(), 1);
    assert!(clearance[0].is_placeholder());

    let sale = records_for(records, "Sale");
    assert_eq!(sale.len(), 1);
    assert!(sale[0].is_placeholder());

    assert_eq!(records_for(records, "Desks")[0].sku, "IMTM384");
    assert_eq!(report.stats.categories, 3);
    assert_eq!(report.stats.category_failures, 2);
    assert_eq!(report.stats.placeholders, 2);
    assert_eq!(sink.snapshots().len(), 3);
}

#[tokio::test]
async fn test_snapshot_after_each_category_holds_everything_so_far() {
    let driver = ScriptedDriver::new()
        .page(
            martin().url,
            brand_page(&[
                ("Desks", "/martin/desks"),
                ("Bookcases", "/martin/bookcases"),
                ("File Cabinets", "/martin/files"),
            ]),
        )
        .page(url("/martin/desks"), listing_page(&["/p/desk-1"], None))
        .page(
            url("/martin/bookcases"),
            listing_page(&["/p/book-1", "/p/book-2"], None),
        )
        .page(url("/martin/files"), listing_page(&[], None))
        .page(url("/p/desk-1"), product_page("Desk - D-1", "$100.00", ""))
        .page(url("/p/book-1"), product_page("Bookcase - B-1", "$200.00", ""))
        .page(url("/p/book-2"), product_page("Bookcase - B-2", "$300.00", ""));
    let sink = RecordingSink::new();

    let report = run(config_for(vec![martin()]), driver, sink.clone()).await;
    let snapshots = sink.snapshots();
    assert_eq!(snapshots.len(), 3);
    assert_eq!(report.stats.snapshots_written, 3);

    let names = |snapshot: &Snapshot| -> Vec<String> {
        snapshot.sheets.iter().map(|s| s.name.clone()).collect()
    };
    assert_eq!(names(&snapshots[0]), vec!["Martin Furniture - Desks"]);
    assert_eq!(
        names(&snapshots[1]),
        vec!["Martin Furniture - Desks", "Martin Furniture - Bookcases"]
    );
    assert_eq!(
        names(&snapshots[2]),
        vec![
            "Martin Furniture - Desks",
            "Martin Furniture - Bookcases",
            sheet_name("Martin Furniture - File Cabinets").as_str(),
        ]
    );

    // A crash after the second category leaves exactly these rows behind
    let after_two = &snapshots[1];
    assert_eq!(after_two.row_count(), 3);
    let book_skus: Vec<&str> = after_two.sheets[1].rows.iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(book_skus, vec!["B-1", "B-2"]);

    // Empty listing ends with a placeholder row
    let files = &snapshots[2].sheets[2];
    assert_eq!(files.rows.len(), 1);
    assert_eq!(files.rows[0].sku, "");

    assert_eq!(snapshots[2], Snapshot::from_results(&report.results));
}

#[tokio::test]
async fn test_failed_brand_does_not_stop_later_brands() {
    let broken = Brand::new("Legacy Classic Furniture", url("/brands/brands-legacy-classic"));
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Desks", "/martin/desks")]))
        .page(url("/martin/desks"), listing_page(&["/p/desk-1"], None))
        .page(url("/p/desk-1"), product_page("Desk - D-1", "$100.00", ""));
    let log = driver.log();

    let report = run(
        config_for(vec![broken, martin()]),
        driver,
        RecordingSink::new(),
    )
    .await;

    assert_eq!(report.stats.brands, 2);
    assert_eq!(report.stats.brand_failures, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.records()[0].brand, "Martin Furniture");
    assert!(log.lock().unwrap().closed);
}

#[tokio::test]
async fn test_brand_without_category_anchors_fails_discovery() {
    let driver = ScriptedDriver::new().page(martin().url, "<html><body></body></html>");
    let log = driver.log();

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    assert_eq!(report.stats.brand_failures, 1);
    assert_eq!(report.stats.categories, 0);
    assert!(report.results.is_empty());
    assert!(log.lock().unwrap().closed);
}

#[tokio::test]
async fn test_pagination_follows_next_until_disabled() {
    let last_page = format!(
        "<html><body>{}{}</body></html>",
        r#"<a class="facets-item-cell-grid-title" href="/p/desk-3">Item</a>"#,
        r#"<a class="pagination-next disabled" href="/martin/desks?page=3">Next</a>"#
    );
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Desks", "/martin/desks")]))
        .page(
            url("/martin/desks"),
            listing_page(&["/p/desk-1", "/p/desk-2"], Some("?page=2")),
        )
        .page(url("/martin/desks?page=2"), last_page)
        .page(url("/p/desk-1"), product_page("Desk - D-1", "$100.00", ""))
        .page(url("/p/desk-2"), product_page("Desk - D-2", "$200.00", ""))
        .page(url("/p/desk-3"), product_page("Desk - D-3", "$300.00", ""));
    let log = driver.log();

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    let skus: Vec<&str> = report.results.records().iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(skus, vec!["D-1", "D-2", "D-3"]);
    assert_eq!(report.stats.listing_pages, 2);
    assert_eq!(report.stats.category_failures, 0);

    let log = log.lock().unwrap();
    assert_eq!(log.clicks, vec![url("/martin/desks?page=2")]);
    // The listing is reloaded after the detail pages before the click
    assert_eq!(log.navigation_count(&url("/martin/desks")), 2);
}

#[tokio::test]
async fn test_next_link_back_to_a_visited_page_ends_pagination() {
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Desks", "/martin/desks")]))
        .page(
            url("/martin/desks"),
            listing_page(&["/p/desk-1"], Some("/martin/desks?page=2")),
        )
        .page(
            url("/martin/desks?page=2"),
            listing_page(&["/p/desk-2"], Some("/martin/desks")),
        )
        .page(url("/p/desk-1"), product_page("Desk - D-1", "$100.00", ""))
        .page(url("/p/desk-2"), product_page("Desk - D-2", "$200.00", ""));

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    assert_eq!(report.stats.listing_pages, 2);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.stats.category_failures, 0);
}

#[tokio::test]
async fn test_failure_on_later_page_keeps_earlier_records() {
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Desks", "/martin/desks")]))
        .page(
            url("/martin/desks"),
            listing_page(&["/p/desk-1"], Some("?page=2")),
        )
        .failing(url("/martin/desks?page=2"))
        .page(url("/p/desk-1"), product_page("Desk - D-1", "$100.00", ""));

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    assert_eq!(report.stats.category_failures, 1);
    assert_eq!(report.stats.placeholders, 0);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.records()[0].sku, "D-1");
}

#[tokio::test]
async fn test_product_fields_flow_into_records() {
    let detail = r#"<html><body>
        <h1>Oak Dresser - Martin Furniture MF-1234</h1>
        <div class="price-was">$1,499.00</div>
        <form id="product-details-full-form"><span itemprop="price"> $1,299.00 </span></form>
        <div id="special-coupon-message-container"><b>Extra 10% off with code SAVE10</b></div>
        </body></html>"#;
    let driver = ScriptedDriver::new()
        .page(martin().url, brand_page(&[("Dressers", "/martin/dressers")]))
        .page(url("/martin/dressers"), listing_page(&["/p/dresser"], None))
        .page(url("/p/dresser"), detail);

    let report = run(config_for(vec![martin()]), driver, RecordingSink::new()).await;

    let record = &report.results.records()[0];
    assert_eq!(record.brand, "Martin Furniture");
    assert_eq!(record.category, "Dressers");
    assert_eq!(record.sku, "Martin Furniture MF-1234");
    assert_eq!(record.price, "$1,299.00");
    assert_eq!(record.comment, "Extra 10% off with code SAVE10");
    assert_eq!(report.stats.products, 1);
}

#[tokio::test]
async fn test_failed_snapshot_write_does_not_stop_the_crawl() {
    let driver = ScriptedDriver::new()
        .page(
            martin().url,
            brand_page(&[("Desks", "/martin/desks"), ("Bookcases", "/martin/bookcases")]),
        )
        .page(url("/martin/desks"), listing_page(&[], None))
        .page(url("/martin/bookcases"), listing_page(&[], None));
    let sink = RecordingSink::new().failing_write(1);

    let report = run(config_for(vec![martin()]), driver, sink.clone()).await;

    assert_eq!(report.stats.snapshot_failures, 1);
    assert_eq!(report.stats.snapshots_written, 1);

    // The next write still carries the first category
    let snapshots = sink.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].sheets.len(), 2);
}
