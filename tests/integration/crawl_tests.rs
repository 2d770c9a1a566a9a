//! Integration tests for the crawler
//!
//! These tests drive traversals, domain orchestrators and the coordinator
//! against a scripted renderer, so the full crawl cycle runs without a
//! network.

use crate::support::{crawler_config, test_config, ScriptedPage, ScriptedSite};
use product_scout::crawler::{Coordinator, DomainCrawler, TraversalEngine, TraversalSettings};
use product_scout::{CrawlPhase, LinkClassifier};
use std::sync::Arc;
use std::time::Duration;

fn engine(site: &ScriptedSite) -> TraversalEngine<ScriptedSite> {
    TraversalEngine::new(
        Arc::new(site.clone()),
        Arc::new(LinkClassifier::new()),
        TraversalSettings::default(),
    )
}

fn sorted<'a>(urls: impl Iterator<Item = &'a url::Url>) -> Vec<String> {
    let mut urls: Vec<String> = urls.map(|u| u.to_string()).collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_single_traversal_scenario() {
    let site = ScriptedSite::new(vec![(
        "https://shop.test/",
        ScriptedPage::links(&["/product/1", "/category/a", "/login"]),
    )]);
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(20), "shop.test").unwrap();

    assert_eq!(crawler.run_batch().await, 1);

    let state = crawler.state();
    assert_eq!(sorted(state.products().iter()), vec!["https://shop.test/product/1"]);
    assert_eq!(sorted(state.frontier()), vec!["https://shop.test/category/a"]);
    assert_eq!(sorted(state.visited().iter()), vec!["https://shop.test/"]);
    assert!(!state
        .ever_enqueued()
        .iter()
        .any(|u| u.path() == "/login"));
    assert_eq!(site.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_then_success_contributes_links() {
    let site = ScriptedSite::new(vec![(
        "https://shop.test/",
        ScriptedPage::links(&["/category/a", "/product/7"]).failing(2),
    )]);
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(20), "shop.test").unwrap();

    let start = tokio::time::Instant::now();
    crawler.run_batch().await;
    let elapsed = start.elapsed();

    // 1s after the first failure, 2s after the second
    assert!(elapsed >= Duration::from_secs(3), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "elapsed {:?}", elapsed);
    assert_eq!(site.opens("https://shop.test/"), 3);

    let state = crawler.state();
    assert_eq!(sorted(state.frontier()), vec!["https://shop.test/category/a"]);
    assert_eq!(state.products().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_terminates_when_every_traversal_fails() {
    let site = ScriptedSite::new(vec![(
        "https://shop.test/",
        ScriptedPage::links(&["/category/a"]).failing(usize::MAX),
    )]);
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(20), "shop.test").unwrap();

    crawler.run().await.unwrap();

    let state = crawler.state();
    assert_eq!(state.phase(), CrawlPhase::Done);
    assert_eq!(state.visited_count(), 1);
    assert_eq!(state.frontier_len(), 0);
    assert!(state.products().is_empty());
    // at most three attempts, never requeued
    assert_eq!(site.opens("https://shop.test/"), 3);
}

#[tokio::test]
async fn test_visited_never_exceeds_budget() {
    // every category links to the next three, far more than the budget
    let pages: Vec<(String, ScriptedPage)> = (0..40)
        .map(|i| {
            let url = if i == 0 {
                "https://shop.test/".to_string()
            } else {
                format!("https://shop.test/category/{}", i)
            };
            let links: Vec<String> = (1..=3)
                .map(|k| format!("/category/{}", i + k))
                .chain(std::iter::once(format!("/product/{}", i)))
                .collect();
            let page = ScriptedPage {
                links,
                ..ScriptedPage::default()
            };
            (url, page)
        })
        .collect();
    let site = ScriptedSite::new(pages.iter().map(|(u, p)| (u.as_str(), p.clone())).collect());
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(7), "shop.test").unwrap();

    crawler.run().await.unwrap();

    let state = crawler.state();
    assert_eq!(state.phase(), CrawlPhase::Done);
    assert_eq!(state.visited_count(), 7);
    assert!(state.visited().is_subset(state.ever_enqueued()));
    assert!(state.frontier().all(|u| !state.products().contains(u)));
}

fn paginated_site() -> ScriptedSite {
    ScriptedSite::new(vec![
        ("https://shop.test/", ScriptedPage::links(&["/category/a"])),
        (
            "https://shop.test/category/a",
            ScriptedPage::links(&["/product/1"]).with_next("/category/a/page/2"),
        ),
        (
            "https://shop.test/category/a/page/2",
            ScriptedPage::links(&["/product/2", "/category/b"]).with_next("/category/a/page/3"),
        ),
        (
            "https://shop.test/category/a/page/3",
            ScriptedPage::links(&["/product/3"]).with_next("/category/a"),
        ),
        ("https://shop.test/category/b", ScriptedPage::default()),
    ])
}

#[tokio::test]
async fn test_pagination_pages_are_visited_not_enqueued() {
    let site = paginated_site();
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(20), "shop.test").unwrap();

    crawler.run().await.unwrap();

    let state = crawler.state();
    assert_eq!(
        sorted(state.products().iter()),
        vec![
            "https://shop.test/product/1",
            "https://shop.test/product/2",
            "https://shop.test/product/3"
        ]
    );
    assert_eq!(
        sorted(state.visited().iter()),
        vec![
            "https://shop.test/",
            "https://shop.test/category/a",
            "https://shop.test/category/a/page/2",
            "https://shop.test/category/a/page/3",
            "https://shop.test/category/b"
        ]
    );
    // reached by activating "next", never opened on its own
    assert_eq!(site.opens("https://shop.test/category/a/page/2"), 0);
    assert_eq!(site.in_flight(), 0);
}

#[tokio::test]
async fn test_query_string_pagination_collects_every_page() {
    let site = ScriptedSite::new(vec![
        ("https://shop.test/", ScriptedPage::links(&["/shop"])),
        (
            "https://shop.test/shop",
            ScriptedPage::links(&["/product/1"]).with_next("/shop?page=2"),
        ),
        (
            "https://shop.test/shop?page=2",
            ScriptedPage::links(&["/product/2", "/category/b"]).with_next("/shop?page=3"),
        ),
        (
            "https://shop.test/shop?page=3",
            ScriptedPage::links(&["/product/3"]),
        ),
        ("https://shop.test/category/b", ScriptedPage::default()),
    ]);
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(20), "shop.test").unwrap();

    crawler.run().await.unwrap();

    let state = crawler.state();
    assert_eq!(
        sorted(state.products().iter()),
        vec![
            "https://shop.test/product/1",
            "https://shop.test/product/2",
            "https://shop.test/product/3"
        ]
    );
    assert_eq!(
        sorted(state.visited().iter()),
        vec![
            "https://shop.test/",
            "https://shop.test/category/b",
            "https://shop.test/shop"
        ]
    );
    assert_eq!(site.opens("https://shop.test/shop?page=2"), 0);
}

#[tokio::test]
async fn test_pagination_respects_budget() {
    let site = paginated_site();
    let engine = engine(&site);
    let mut crawler = DomainCrawler::new(&engine, &crawler_config(2), "shop.test").unwrap();

    crawler.run().await.unwrap();

    let state = crawler.state();
    assert_eq!(state.visited_count(), 2);
    // products on pagination pages are still collected
    assert_eq!(state.products().len(), 3);
}

#[tokio::test]
async fn test_failing_domain_does_not_stop_others() {
    let site = ScriptedSite::panicking_on(
        vec![
            (
                "https://shop.test/",
                ScriptedPage::links(&["/product/1", "/category/a"]),
            ),
            ("https://shop.test/category/a", ScriptedPage::default()),
        ],
        "panic.test",
    );
    let config = test_config(
        &["shop.test", "panic.test", "bad domain"],
        crawler_config(10),
        "./unused",
    );
    let coordinator = Coordinator::new(config, site);

    let reports = coordinator.run().await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].domain, "shop.test");
    assert!(reports[0].completed());
    assert_eq!(reports[0].total_products, 1);
    assert_eq!(reports[0].pages_visited, 2);

    assert_eq!(reports[1].domain, "panic.test");
    assert!(reports[1].error.as_deref().unwrap().contains("panicked"));
    assert_eq!(reports[1].pages_visited, 1);

    assert_eq!(reports[2].domain, "bad domain");
    assert!(!reports[2].completed());
    assert_eq!(reports[2].pages_visited, 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_bounds_compose() {
    let mut pages = Vec::new();
    for domain in ["a.test", "b.test", "c.test"] {
        let links: Vec<String> = (0..6).map(|i| format!("/category/{}", i)).collect();
        pages.push((
            format!("https://{}/", domain),
            ScriptedPage {
                links,
                ..ScriptedPage::default()
            },
        ));
        for i in 0..6 {
            pages.push((
                format!("https://{}/category/{}", domain, i),
                ScriptedPage::default(),
            ));
        }
    }
    let site = ScriptedSite::with_delay(
        pages.iter().map(|(u, p)| (u.as_str(), p.clone())).collect(),
        Duration::from_millis(50),
    );

    let crawler = product_scout::config::CrawlerConfig {
        concurrent_requests: 2,
        max_concurrent_requests_pages: 2,
        ..crawler_config(10)
    };
    let config = test_config(&["a.test", "b.test", "c.test"], crawler, "./unused");
    let coordinator = Coordinator::new(config, site.clone());

    let reports = coordinator.run().await;

    assert!(reports.iter().all(|r| r.completed() && r.pages_visited == 7));
    assert!(site.max_in_flight() <= 4, "max in flight {}", site.max_in_flight());
    assert!(site.max_in_flight() >= 2);
    assert_eq!(site.in_flight(), 0);
}
