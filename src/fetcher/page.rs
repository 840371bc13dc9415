use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::{GramfeedError, Result};
use crate::browser::{BrowserPage, BrowserSession};
use crate::fetcher::{FetchConfig, Fetcher};

const STATUS_FORBIDDEN: u16 = 403;

/// Loads a single page in a fresh tab and returns the rendered document
pub struct PageFetcher {
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    async fn load(&self, page: &mut dyn BrowserPage, url: &str) -> Result<String> {
        let headers = self.config.headers();
        let timeout = self.config.timeout();

        let status = tokio::time::timeout(timeout, page.navigate(url, &headers))
            .await
            .map_err(|_| GramfeedError::Timeout {
                url: url.to_string(),
                after: timeout,
            })??;

        if status == Some(STATUS_FORBIDDEN) {
            return Err(GramfeedError::Blocked {
                url: url.to_string(),
                status: STATUS_FORBIDDEN,
            });
        }

        // Let client-side rendering finish before taking the snapshot
        let settle = self.config.settle();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        page.content().await
    }
}

#[async_trait]
impl Fetcher for PageFetcher {
    async fn fetch(&self, url: &str, session: &dyn BrowserSession) -> Result<String> {
        let mut page = session.new_page().await?;

        let result = self.load(page.as_mut(), url).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", url, e);
        }

        match &result {
            Ok(document) => debug!("Fetched {} ({} bytes)", url, document.len()),
            Err(e) => warn!("Fetch failed for {}: {}", url, e),
        }

        result
    }
}
