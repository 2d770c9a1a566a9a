//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DomainCrawlState`: the per-domain frontier with its visited, enqueued and product sets
//! - `CrawlPhase`: lifecycle of a single domain's crawl

mod crawl_phase;
mod domain_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use domain_state::DomainCrawlState;
