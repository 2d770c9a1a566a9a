//! JSON artifact writer
//!
//! Each run produces two pretty-printed files in the output directory:
//! `results-{timestamp}.json` and `summary-{timestamp}.json`.

use crate::config::OutputConfig;
use crate::output::traits::{DomainReport, OutputError, OutputResult, ResultSink, RunSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes run artifacts as JSON files into a directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.output_dir)
    }

    /// Path of the results artifact for `timestamp`
    pub fn results_path(&self, timestamp: &str) -> PathBuf {
        self.output_dir.join(format!("results-{}.json", timestamp))
    }

    /// Path of the summary artifact for `timestamp`
    pub fn summary_path(&self, timestamp: &str) -> PathBuf {
        self.output_dir.join(format!("summary-{}.json", timestamp))
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> OutputResult<()> {
        fs::create_dir_all(&self.output_dir)?;

        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).map_err(|e| {
            OutputError::Write(format!("{}: {}", path.display(), e))
        })?;

        tracing::info!("Saved {}", path.display());
        Ok(())
    }
}

impl ResultSink for JsonFileSink {
    fn write_results(&self, reports: &[DomainReport], timestamp: &str) -> OutputResult<()> {
        let results: BTreeMap<&str, &DomainReport> = reports
            .iter()
            .map(|report| (report.domain.as_str(), report))
            .collect();

        self.write_json(&self.results_path(timestamp), &results)
    }

    fn write_summary(&self, summary: &RunSummary) -> OutputResult<()> {
        self.write_json(&self.summary_path(&summary.timestamp), summary)
    }
}
