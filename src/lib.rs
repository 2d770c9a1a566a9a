//! Product-Scout: an e-commerce product page discoverer
//!
//! This crate crawls shop domains from their home page, follows in-page
//! pagination controls, and sorts every discovered link into product pages,
//! listing pages worth expanding, or irrelevant pages.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Product-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Render failure for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Timed out after {after:?} waiting for {url}")]
    Timeout { url: String, after: Duration },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Crawl of {domain} failed: {message}")]
    DomainFailure { domain: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

impl ScoutError {
    /// Returns true for failures raised while rendering or navigating a page.
    ///
    /// These are the failures a traversal is retried for.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            Self::Render { .. } | Self::Timeout { .. } | Self::Http { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Empty href")]
    Empty,
}

/// Result type alias for Product-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlPhase, DomainCrawlState};
pub use crate::url::{normalize, LinkClass, LinkClassifier};
