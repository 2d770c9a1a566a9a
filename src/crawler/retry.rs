//! Retry schedule for failed traversals

use crate::config::CrawlerConfig;
use std::time::Duration;

/// Exponential backoff schedule with a fixed attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,

    /// Delay before the first retry; doubled for every further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.max_attempts, config.retry_base_delay())
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    ///
    /// Returns `None` once the attempt budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u32 << (attempt - 1).min(16);
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Sum of all delays when every attempt fails
    pub fn total_delay(&self) -> Duration {
        (1..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
