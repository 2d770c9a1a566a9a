//! Integration tests for result persistence

use crate::support::{crawler_config, test_config, ScriptedPage, ScriptedSite};
use product_scout::crawler::Coordinator;
use product_scout::output::{JsonFileSink, RunSummary};
use product_scout::ScoutError;
use std::fs;
use tempfile::TempDir;

fn shop() -> ScriptedSite {
    ScriptedSite::new(vec![
        (
            "https://shop.test/",
            ScriptedPage::links(&["/product/1", "/category/a", "/cart"]),
        ),
        (
            "https://shop.test/category/a",
            ScriptedPage::links(&["/product/2", "/product/1"]),
        ),
    ])
}

#[tokio::test]
async fn test_run_and_persist_writes_both_artifacts() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("results");
    let config = test_config(
        &["shop.test"],
        crawler_config(20),
        output_dir.to_str().unwrap(),
    );
    let sink = JsonFileSink::from_config(&config.output);
    let coordinator = Coordinator::new(config, shop());

    let summary = coordinator.run_and_persist(&sink, "abc123").await.unwrap();

    assert_eq!(summary.config_hash, "abc123");
    assert_eq!(summary.total_domains, 1);
    assert_eq!(summary.total_products(), 2);

    let results = fs::read_to_string(sink.results_path(&summary.timestamp)).unwrap();
    let results: serde_json::Value = serde_json::from_str(&results).unwrap();
    let shop = &results["shop.test"];
    assert_eq!(
        shop["productUrls"],
        serde_json::json!(["https://shop.test/product/1", "https://shop.test/product/2"])
    );
    assert_eq!(shop["totalProducts"], 2);
    assert_eq!(shop["pagesVisited"], 2);
    assert_eq!(
        shop["visitedUrls"],
        serde_json::json!(["https://shop.test/", "https://shop.test/category/a"])
    );
    assert!(shop.get("error").is_none());

    let written = fs::read_to_string(sink.summary_path(&summary.timestamp)).unwrap();
    let written: RunSummary = serde_json::from_str(&written).unwrap();
    assert_eq!(written, summary);
    assert_eq!(written.domains[0].product_count, 2);
    assert!(written.domains[0].completed);
}

#[tokio::test]
async fn test_persistence_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, "occupied").unwrap();

    let config = test_config(&["shop.test"], crawler_config(20), "./unused");
    let sink = JsonFileSink::new(blocker.join("results"));
    let coordinator = Coordinator::new(config, shop());

    let result = coordinator.run_and_persist(&sink, "abc123").await;

    assert!(matches!(result, Err(ScoutError::Output(_))));
}
