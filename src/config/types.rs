use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Product-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Domains to crawl, e.g. "www.example-shop.com"
    pub domains: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages marked visited per domain
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: u32,

    /// Number of domains crawled at the same time
    #[serde(rename = "concurrent-requests")]
    pub concurrent_requests: u32,

    /// Number of traversals in flight per domain
    #[serde(rename = "max-concurrent-requests-pages")]
    pub max_concurrent_requests_pages: u32,

    /// Total traversal attempts per URL, first try included
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff before the first retry (milliseconds), doubled for each further retry
    #[serde(rename = "retry-base-delay-ms")]
    pub retry_base_delay_ms: u64,

    /// Pause between two batches of the same domain (milliseconds)
    #[serde(rename = "batch-pause-ms")]
    pub batch_pause_ms: u64,

    /// Upper bound on every render or navigation wait (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,

    /// Maximum number of "next" activations in a single traversal
    #[serde(rename = "max-pagination-steps")]
    pub max_pagination_steps: u32,
}

impl CrawlerConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_domain: 20,
            concurrent_requests: 5,
            max_concurrent_requests_pages: 5,
            max_attempts: 3,
            retry_base_delay_ms: 1000,
            batch_pause_ms: 500,
            navigation_timeout_secs: 60,
            max_pagination_steps: 50,
        }
    }
}

/// Lazy-load scrolling performed after each render
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Distance of a single scroll increment (pixels)
    #[serde(rename = "step-px")]
    pub step_px: u32,

    /// Total scroll distance cap (pixels)
    #[serde(rename = "max-distance-px")]
    pub max_distance_px: u32,

    /// Wait between two increments (milliseconds)
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,
}

impl ScrollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step_px: 100,
            max_distance_px: 10_000,
            interval_ms: 100,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the results and summary artifacts
    #[serde(rename = "output-dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "./crawler-output".to_string(),
        }
    }
}
