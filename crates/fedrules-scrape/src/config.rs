use std::time::Duration;

/// Tuning knobs for [`RuleScraper`](crate::RuleScraper).
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Maximum fetches in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Per-request timeout, connect included.
    pub timeout: Duration,
    pub user_agent: String,
    /// Additional attempts after a transient failure. 0 means fail-fast.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub retry_backoff: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
            user_agent: format!("fedrules/{}", env!("CARGO_PKG_VERSION")),
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl ScrapeConfig {
    /// Backoff before retry number `attempt` (0-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}
