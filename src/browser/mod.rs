//! Browser automation seam.
//!
//! The fetch layer only needs two capabilities from a browser: open a page
//! and close the whole session. [`ChromeSession`] provides them with a local
//! headless Chrome driven over CDP.
//!
//! ```rust,ignore
//! use gramfeed::browser::{BrowserSession, ChromeSession, LaunchConfig};
//!
//! let session = ChromeSession::launch(&LaunchConfig::default()).await?;
//! let mut page = session.new_page().await?;
//! let status = page.navigate("https://example.com", &[]).await?;
//! let html = page.content().await?;
//! page.close().await?;
//! session.close().await?;
//! ```

mod chrome;
mod config;
#[cfg(test)]
pub(crate) mod fake;

pub use chrome::ChromeSession;
pub use config::LaunchConfig;

use async_trait::async_trait;

use crate::app::Result;

/// One open tab
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigate to `url` with extra request headers.
    ///
    /// Returns the HTTP status of the main-frame response when the browser
    /// reported one.
    async fn navigate(&mut self, url: &str, headers: &[(&'static str, String)]) -> Result<Option<u16>>;

    /// Snapshot of the rendered document
    async fn content(&mut self) -> Result<String>;

    /// Release the tab. Calling this twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// A browser instance shared by every fetch of one aggregation
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>>;

    /// Shut the browser down. Pages cannot be opened afterwards.
    async fn close(&self) -> Result<()>;
}
