//! Output module for persisting crawl results
//!
//! This module handles:
//! - Turning per-domain crawl state into reports
//! - Writing the results and summary artifacts
//! - Printing a console summary

mod json;
pub mod stats;
mod traits;

pub use json::JsonFileSink;
pub use stats::{format_summary, print_summary};
pub use traits::{
    DomainReport, DomainSummary, OutputError, OutputResult, ResultSink, RunSummary,
};

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Formats `at` as a timestamp usable in file names
///
/// `2024-05-01T10:00:00.123Z` becomes `2024-05-01T10-00-00-123Z`.
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// Builds the run summary from the domain reports
///
/// # Arguments
///
/// * `reports` - One report per configured domain, in configuration order
/// * `config_hash` - Hash of the configuration the run used
/// * `started_at` - When the run started
/// * `duration` - How long the run took
pub fn build_summary(
    reports: &[DomainReport],
    config_hash: &str,
    started_at: DateTime<Utc>,
    duration: Duration,
) -> RunSummary {
    RunSummary {
        timestamp: file_timestamp(started_at),
        config_hash: config_hash.to_string(),
        duration_seconds: duration.as_secs_f64(),
        total_domains: reports.len(),
        domains: reports.iter().map(DomainSummary::from).collect(),
    }
}

/// Writes both artifacts of a run through `sink`
pub fn persist(sink: &dyn ResultSink, reports: &[DomainReport], summary: &RunSummary) -> OutputResult<()> {
    sink.write_results(reports, &summary.timestamp)?;
    sink.write_summary(summary)
}
