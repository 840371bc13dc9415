use std::sync::Mutex;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{GramfeedError, Result};
use crate::browser::config::LaunchConfig;
use crate::browser::{BrowserPage, BrowserSession};

/// Browser session backed by a local Chrome instance via chromiumoxide
pub struct ChromeSession {
    browser: RwLock<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeSession {
    /// Launch a new browser with the given configuration
    pub async fn launch(config: &LaunchConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height);

        for arg in config.args() {
            builder = builder.arg(arg);
        }

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(|e| {
            GramfeedError::Browser(format!("Failed to build browser config: {}", e))
        })?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            GramfeedError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        info!("Browser session launched");

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        let guard = self.browser.read().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| GramfeedError::Browser("Browser session already closed".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| GramfeedError::Browser(format!("Failed to create page: {}", e)))?;

        Ok(Box::new(ChromePage { page: Some(page) }))
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.browser.write().await;
        let Some(mut browser) = guard.take() else {
            return Ok(());
        };

        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }

        if let Ok(mut handler) = self.handler.lock() {
            if let Some(handle) = handler.take() {
                handle.abort();
            }
        }

        info!("Browser session closed");
        closed
            .map(|_| ())
            .map_err(|e| GramfeedError::Browser(format!("Failed to close browser: {}", e)))
    }
}

/// A single tab opened by [`ChromeSession`]
struct ChromePage {
    page: Option<Page>,
}

impl ChromePage {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| GramfeedError::Browser("Page already closed".into()))
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn navigate(&mut self, url: &str, headers: &[(&'static str, String)]) -> Result<Option<u16>> {
        let page = self.page()?;

        let mut extra = Map::new();
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("user-agent") {
                page.set_user_agent(value)
                    .await
                    .map_err(|e| GramfeedError::Browser(format!("Failed to set user agent: {}", e)))?;
            }
            extra.insert(name.to_string(), Value::String(value.clone()));
        }

        page.execute(SetExtraHttpHeadersParams::new(Headers::new(Value::Object(extra))))
            .await
            .map_err(|e| GramfeedError::Browser(format!("Failed to set headers: {}", e)))?;

        page.goto(url)
            .await
            .map_err(|e| GramfeedError::Browser(format!("Navigation failed: {}", e)))?;

        let request = page
            .wait_for_navigation_response()
            .await
            .map_err(|e| GramfeedError::Browser(format!("Navigation failed: {}", e)))?;

        Ok(request.and_then(|req| {
            req.response
                .as_ref()
                .and_then(|response| u16::try_from(response.status).ok())
        }))
    }

    async fn content(&mut self) -> Result<String> {
        let page = self.page()?;
        Ok(page.content().await?)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            page.close().await?;
        }
        Ok(())
    }
}
