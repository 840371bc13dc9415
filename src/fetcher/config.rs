use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app::{GramfeedError, Result};

/// Configuration for a single page fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Navigation timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait after navigation before reading the document, in milliseconds (default: 2000)
    pub settle_ms: u64,

    /// Accept-Language header sent with every page request
    pub accept_language: String,

    /// Accept header sent with every page request
    pub accept: String,

    /// User agent string to use
    pub user_agent: String,

    /// Referer header sent with every page request
    pub referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            settle_ms: 2000,
            accept_language: "en-US,en;q=0.9".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://www.google.com/".to_string(),
        }
    }
}

impl FetchConfig {
    /// Get the navigation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the settle delay as a Duration
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Extra headers attached to every navigation, as (name, value) pairs
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Accept-Language", self.accept_language.clone()),
            ("Accept", self.accept.clone()),
            ("User-Agent", self.user_agent.clone()),
            ("Referer", self.referer.clone()),
        ]
    }
}

/// Bounded retry policy for page fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one (default: 3)
    pub max_attempts: usize,

    /// Delay before each retry attempt, in milliseconds (default: 2000)
    pub retry_delay_ms: u64,

    /// Run the first attempt immediately before fanning out retries (default: true)
    pub immediate_first_attempt: bool,

    /// Maximum number of retry attempts in flight at once (default: 4)
    pub max_concurrency: usize,

    /// Delay used instead of `retry_delay_ms` when the first attempt was blocked.
    /// Unset means blocked and timed-out attempts are retried alike.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_retry_delay_ms: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 2000,
            immediate_first_attempt: true,
            max_concurrency: 4,
            blocked_retry_delay_ms: None,
        }
    }
}

impl RetryPolicy {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Delay for the retry batch, given whether the first attempt was blocked
    pub fn delay_after(&self, blocked: bool) -> Duration {
        match self.blocked_retry_delay_ms {
            Some(ms) if blocked => Duration::from_millis(ms),
            _ => self.retry_delay(),
        }
    }

    /// A policy with no delays, for tests and local debugging
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            retry_delay_ms: 0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(GramfeedError::Config(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(GramfeedError::Config(
                "retry.max_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
