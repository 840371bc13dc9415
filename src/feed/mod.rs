//! Profile feed assembly.
//!
//! # Architecture
//!
//! ```text
//! profile page → post listing → per-post images (cached) → FeedResult
//! ```
//!
//! Every fetch goes through the [`RetryOrchestrator`](crate::fetcher::RetryOrchestrator).
//! Image sets of multi-image posts are memoized by post link, so repeated
//! builds only fetch detail pages for posts not seen before.

mod aggregator;

pub use aggregator::ProfileAggregator;

use serde::{Deserialize, Serialize};

/// Configuration for feed assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum post detail pages resolved at once (default: 4)
    pub detail_concurrency: usize,

    /// Keep a post without images when its detail page cannot be resolved,
    /// instead of failing the whole feed (default: false)
    pub isolate_post_failures: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: 4,
            isolate_post_failures: false,
        }
    }
}
