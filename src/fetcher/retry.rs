use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::app::{GramfeedError, Result};
use crate::browser::BrowserSession;
use crate::fetcher::{Fetcher, RetryPolicy};

/// Wraps a [`Fetcher`] with an immediate first attempt followed by a batch
/// of delayed retries that run concurrently.
///
/// All retries share the same delay, so total latency stays around one
/// delay period no matter how many attempts the policy allows. When several
/// retries succeed, the earliest issued one wins.
pub struct RetryOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    policy: RetryPolicy,
}

impl RetryOrchestrator {
    pub fn new(fetcher: Arc<dyn Fetcher>, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    pub async fn fetch_with_retry(&self, url: &str, session: &dyn BrowserSession) -> Result<String> {
        let attempts = self.policy.max_attempts.max(1);
        let mut remaining = attempts;
        let mut last_error = None;
        let mut blocked = false;

        if self.policy.immediate_first_attempt {
            match self.fetcher.fetch(url, session).await {
                Ok(document) => return Ok(document),
                Err(e) => {
                    warn!("Initial attempt failed for {}: {}", url, e);
                    blocked = e.is_blocked();
                    last_error = Some(e);
                    remaining -= 1;
                }
            }
        }

        if remaining > 0 {
            let delay = self.policy.delay_after(blocked);
            debug!(
                "Launching {} retries for {} after {:?}",
                remaining, url, delay
            );

            // Completion counter, used to find the most recently observed error
            let completed = AtomicUsize::new(0);
            let completed = &completed;
            let fetcher = &self.fetcher;

            let outcomes: Vec<(usize, Result<String>)> = stream::iter(1..=remaining)
                .map(move |index| async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let result = fetcher.fetch(url, session).await;
                    if let Err(ref e) = result {
                        warn!("Retry {} failed for {}: {}", index, url, e);
                    }
                    (completed.fetch_add(1, Ordering::SeqCst), result)
                })
                .buffered(self.policy.max_concurrency.max(1))
                .collect()
                .await;

            let mut last_seen = None;
            for (seq, result) in outcomes {
                match result {
                    Ok(document) => return Ok(document),
                    Err(e) => {
                        if last_seen.map_or(true, |s| seq > s) {
                            last_seen = Some(seq);
                            last_error = Some(e);
                        }
                    }
                }
            }
        }

        let last = last_error
            .unwrap_or_else(|| GramfeedError::Browser(format!("No attempts made for {}", url)));
        warn!("All {} attempts failed for {}", attempts, url);

        Err(GramfeedError::AllAttemptsExhausted {
            url: url.to_string(),
            attempts,
            last: Box::new(last),
        })
    }
}
