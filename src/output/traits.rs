//! Result sink trait and report types
//!
//! This module defines the trait interface for persisting crawl results and
//! the per-domain and per-run records handed to it.

use crate::state::DomainCrawlState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything collected for one domain
///
/// Serialized as the value of the domain's entry in the results artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    /// The domain (used as the map key, not serialized in the value)
    #[serde(skip)]
    pub domain: String,

    /// Product page URLs, sorted
    pub product_urls: Vec<String>,

    pub total_products: usize,

    pub pages_visited: usize,

    /// Visited URLs, sorted
    pub visited_urls: Vec<String>,

    /// Why the crawl stopped early, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainReport {
    /// Builds a report from a domain's final state
    pub fn from_state(state: &DomainCrawlState, error: Option<String>) -> Self {
        let product_urls = sorted(state.products().iter());
        let visited_urls = sorted(state.visited().iter());

        Self {
            domain: state.domain().to_string(),
            total_products: product_urls.len(),
            pages_visited: visited_urls.len(),
            product_urls,
            visited_urls,
            error,
        }
    }

    /// Report for a domain that failed before collecting anything
    pub fn failed(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            product_urls: Vec::new(),
            total_products: 0,
            pages_visited: 0,
            visited_urls: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// True if the domain's crawl ran to completion
    pub fn completed(&self) -> bool {
        self.error.is_none()
    }
}

fn sorted<'a>(urls: impl Iterator<Item = &'a Url>) -> Vec<String> {
    let mut urls: Vec<String> = urls.map(Url::to_string).collect();
    urls.sort();
    urls
}

/// One line of the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub domain: String,
    pub product_count: usize,
    pub pages_visited: usize,
    pub completed: bool,
}

impl From<&DomainReport> for DomainSummary {
    fn from(report: &DomainReport) -> Self {
        Self {
            domain: report.domain.clone(),
            product_count: report.total_products,
            pages_visited: report.pages_visited,
            completed: report.completed(),
        }
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// File-name-safe UTC timestamp shared by both artifacts of the run
    pub timestamp: String,

    pub config_hash: String,

    pub duration_seconds: f64,

    pub total_domains: usize,

    pub domains: Vec<DomainSummary>,
}

impl RunSummary {
    /// Total product pages across all domains
    pub fn total_products(&self) -> usize {
        self.domains.iter().map(|d| d.product_count).sum()
    }

    /// Total pages visited across all domains
    pub fn total_pages_visited(&self) -> usize {
        self.domains.iter().map(|d| d.pages_visited).sum()
    }

    /// Number of domains whose crawl failed
    pub fn failed_domains(&self) -> usize {
        self.domains.iter().filter(|d| !d.completed).count()
    }
}

/// Trait for result sinks
///
/// A sink receives the results of a finished run. Any failure is fatal for
/// the run, since results that were not persisted are lost.
pub trait ResultSink: Send + Sync {
    /// Writes the per-domain results
    ///
    /// # Arguments
    ///
    /// * `reports` - One report per configured domain
    /// * `timestamp` - The run's timestamp, as in [`RunSummary::timestamp`]
    fn write_results(&self, reports: &[DomainReport], timestamp: &str) -> OutputResult<()>;

    /// Writes the run summary
    fn write_summary(&self, summary: &RunSummary) -> OutputResult<()>;
}
