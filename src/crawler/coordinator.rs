//! Crawler coordinator - multi-domain crawl orchestration
//!
//! This module runs every configured domain through its own orchestrator:
//! - Domains progress in fixed-size concurrent batches
//! - A failing domain is logged and reported with its partial results
//! - Reports are aggregated and handed to a result sink

use crate::config::Config;
use crate::crawler::orchestrator::DomainCrawler;
use crate::crawler::renderer::Renderer;
use crate::crawler::traversal::{TraversalEngine, TraversalSettings};
use crate::output::{self, DomainReport, ResultSink, RunSummary};
use crate::url::LinkClassifier;
use crate::{Result, ScoutError};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator<R> {
    config: Arc<Config>,
    engine: TraversalEngine<R>,
}

impl<R: Renderer> Coordinator<R> {
    /// Creates a coordinator using the built-in link classifier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `renderer` - Renderer shared by every traversal of every domain
    pub fn new(config: Config, renderer: R) -> Self {
        Self::with_classifier(config, renderer, LinkClassifier::new())
    }

    /// Creates a coordinator with a custom link classifier
    pub fn with_classifier(config: Config, renderer: R, classifier: LinkClassifier) -> Self {
        let settings = TraversalSettings::from_config(&config);
        let engine = TraversalEngine::new(Arc::new(renderer), Arc::new(classifier), settings);

        Self {
            config: Arc::new(config),
            engine,
        }
    }

    /// Crawls every configured domain
    ///
    /// At most `concurrent-requests` domains are in flight at once. Returns
    /// one report per domain, in configuration order.
    pub async fn run(&self) -> Vec<DomainReport> {
        let domains = &self.config.domains;
        let batch_size = self.config.crawler.concurrent_requests.max(1) as usize;
        tracing::info!("Starting crawl for {} domains", domains.len());

        let mut reports = Vec::with_capacity(domains.len());
        for (i, batch) in domains.chunks(batch_size).enumerate() {
            tracing::debug!("Domain batch {}: {}", i + 1, batch.join(", "));
            let batch_reports = join_all(batch.iter().map(|domain| self.crawl_domain(domain))).await;
            reports.extend(batch_reports);
        }

        reports
    }

    /// Crawls every domain, then persists results and summary through `sink`
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Both artifacts were written
    /// * `Err(ScoutError)` - Persisting failed; the run's results are lost
    pub async fn run_and_persist(&self, sink: &dyn ResultSink, config_hash: &str) -> Result<RunSummary> {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();

        let reports = self.run().await;

        let summary = output::build_summary(&reports, config_hash, started_at, start_time.elapsed());
        output::persist(sink, &reports, &summary)?;

        tracing::info!("Crawl completed in {:.1} seconds", summary.duration_seconds);
        Ok(summary)
    }

    /// Crawls a single domain, turning any failure into a report
    async fn crawl_domain(&self, domain: &str) -> DomainReport {
        let mut crawler = match DomainCrawler::new(&self.engine, &self.config.crawler, domain) {
            Ok(crawler) => crawler,
            Err(e) => {
                tracing::error!("Cannot start crawl of {}: {}", domain, e);
                return DomainReport::failed(domain, e.to_string());
            }
        };

        let failure = match AssertUnwindSafe(crawler.run()).catch_unwind().await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };

        let Some(message) = failure else {
            return DomainReport::from_state(crawler.state(), None);
        };

        let error = ScoutError::DomainFailure {
            domain: domain.to_string(),
            message,
        };
        tracing::error!("{}", error);
        crawler.abort();
        DomainReport::from_state(crawler.state(), Some(error.to_string()))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
