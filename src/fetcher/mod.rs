pub mod config;
pub mod page;
pub mod retry;

pub use config::{FetchConfig, RetryPolicy};
pub use page::PageFetcher;
pub use retry::RetryOrchestrator;

use async_trait::async_trait;

use crate::app::Result;
use crate::browser::BrowserSession;

/// One retrieval of a URL through a browser session
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, session: &dyn BrowserSession) -> Result<String>;
}
