//! Crawler module for page traversal and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - The renderer capability and its HTTP implementation
//! - HTML queries for links and pagination controls
//! - Single-page traversal with scrolling and pagination
//! - Per-domain batch orchestration with retry and backoff
//! - Multi-domain coordination

mod coordinator;
mod fetcher;
mod orchestrator;
mod parser;
mod renderer;
mod retry;
mod traversal;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, HttpRenderer, HttpSession};
pub use orchestrator::DomainCrawler;
pub use parser::{extract_hrefs, find_control};
pub use renderer::{PaginationControl, RenderSession, Renderer, NEXT_PAGE_SELECTORS};
pub use retry::RetryPolicy;
pub use traversal::{TraversalEngine, TraversalOutcome, TraversalSettings};

use crate::config::Config;
use crate::output::{JsonFileSink, RunSummary};
use crate::Result;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP renderer
/// 2. Crawl every configured domain
/// 3. Write the results and summary artifacts to the output directory
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded in the summary
///
/// # Returns
///
/// * `Ok(RunSummary)` - Crawl completed and results were saved
/// * `Err(ScoutError)` - The renderer could not be built or saving failed
pub async fn crawl(config: Config, config_hash: &str) -> Result<RunSummary> {
    let renderer = HttpRenderer::new(&config.user_agent, config.crawler.navigation_timeout())?;
    let sink = JsonFileSink::from_config(&config.output);

    let coordinator = Coordinator::new(config, renderer);
    coordinator.run_and_persist(&sink, config_hash).await
}
