//! Domain crawl orchestrator
//!
//! Drains one domain's frontier in bounded concurrent batches. Every URL is
//! marked visited when it is dequeued, so a URL whose traversal keeps failing
//! is abandoned after its last attempt rather than requeued.

use crate::config::CrawlerConfig;
use crate::crawler::renderer::Renderer;
use crate::crawler::retry::RetryPolicy;
use crate::crawler::traversal::{TraversalEngine, TraversalOutcome};
use crate::state::{CrawlPhase, DomainCrawlState};
use crate::Result;
use futures::future::join_all;
use std::time::Duration;
use url::Url;

/// Crawls a single domain to completion
pub struct DomainCrawler<'a, R> {
    engine: &'a TraversalEngine<R>,
    retry: RetryPolicy,
    batch_size: usize,
    batch_pause: Duration,
    state: DomainCrawlState,
}

impl<'a, R: Renderer> DomainCrawler<'a, R> {
    /// Creates an orchestrator for `domain`, seeded with its root URL
    pub fn new(engine: &'a TraversalEngine<R>, config: &CrawlerConfig, domain: &str) -> Result<Self> {
        let state = DomainCrawlState::seeded(domain, config.max_pages_per_domain as usize)?;
        Ok(Self::with_state(engine, config, state))
    }

    /// Creates an orchestrator around an existing state
    pub fn with_state(
        engine: &'a TraversalEngine<R>,
        config: &CrawlerConfig,
        state: DomainCrawlState,
    ) -> Self {
        Self {
            engine,
            retry: RetryPolicy::from_config(config),
            batch_size: config.max_concurrent_requests_pages.max(1) as usize,
            batch_pause: config.batch_pause(),
            state,
        }
    }

    /// Runs the crawl loop until the frontier is empty or the budget is used up
    ///
    /// On return the state is in `Done`. An error means the state machine was
    /// driven wrongly (for example, running an orchestrator twice).
    pub async fn run(&mut self) -> Result<()> {
        self.state.transition(CrawlPhase::Running)?;
        tracing::info!(
            "Starting crawl of {} (budget {} pages)",
            self.state.domain(),
            self.state.page_budget()
        );

        while self.state.has_capacity() {
            self.run_batch().await;

            if self.state.has_capacity() && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
        }

        let finished = if self.state.budget_reached() {
            CrawlPhase::BudgetReached
        } else {
            CrawlPhase::Exhausted
        };
        self.state.transition(finished)?;
        self.state.transition(CrawlPhase::Done)?;

        tracing::info!(
            "Finished {} ({}): {} pages visited, {} products",
            self.state.domain(),
            finished,
            self.state.visited_count(),
            self.state.products().len()
        );
        Ok(())
    }

    /// Dequeues, traverses and merges a single batch
    ///
    /// Returns the number of URLs traversed.
    pub async fn run_batch(&mut self) -> usize {
        let batch = self.state.dequeue_batch(self.batch_size);
        if batch.is_empty() {
            return 0;
        }

        let budget = self.state.page_budget();
        let first = self.state.visited_count() - batch.len();
        for (i, url) in batch.iter().enumerate() {
            tracing::info!("Crawling {} ({}/{})", url, first + i + 1, budget);
        }

        let outcomes = join_all(batch.iter().map(|url| self.traverse_with_retry(url))).await;
        for outcome in outcomes {
            self.merge(outcome);
        }

        batch.len()
    }

    /// Moves the crawl straight to `Done`, keeping what was collected
    pub fn abort(&mut self) {
        if !self.state.phase().is_terminal() {
            if let Err(e) = self.state.transition(CrawlPhase::Done) {
                tracing::error!("Failed to abort crawl of {}: {}", self.state.domain(), e);
            }
        }
    }

    pub fn state(&self) -> &DomainCrawlState {
        &self.state
    }

    pub fn into_state(self) -> DomainCrawlState {
        self.state
    }

    /// Traverses `url`, retrying render failures with exponential backoff
    async fn traverse_with_retry(&self, url: &Url) -> TraversalOutcome {
        let domain = self.state.domain();
        let mut attempt = 1;
        let mut outcome = self.engine.traverse(url, domain).await;

        loop {
            let Some(error) = outcome.error.as_ref() else {
                return outcome;
            };

            if !error.is_render_failure() {
                tracing::warn!("Not retrying {}: {}", url, error);
                return outcome;
            }

            match self.retry.delay_after(attempt) {
                Some(delay) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        self.retry.max_attempts,
                        url,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(
                        "Giving up on {} after {} attempts: {}",
                        url,
                        attempt,
                        error
                    );
                    return outcome;
                }
            }

            attempt += 1;
            let retried = self.engine.traverse(url, domain).await;
            outcome.absorb(retried);
        }
    }

    /// Folds a traversal outcome into the domain state
    fn merge(&mut self, outcome: TraversalOutcome) {
        let succeeded = outcome.is_success();

        for page in &outcome.pages {
            if !self.state.record_pagination_visit(page) {
                tracing::trace!("Not recording pagination page {}", page);
            }
        }

        for product in outcome.products {
            self.state.record_product(product);
        }

        if !succeeded {
            return;
        }

        let mut added = 0;
        for link in &outcome.listing_links {
            if self.state.enqueue_if_new(link.as_str()) {
                added += 1;
            }
        }
        tracing::debug!(
            "{}: {} new listing links, frontier now {}",
            outcome.url,
            added,
            self.state.frontier_len()
        );
    }
}
