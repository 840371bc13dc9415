use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{GramfeedError, Result};
use crate::browser::{BrowserPage, BrowserSession};

/// Scripted reply for one navigation
#[derive(Debug, Clone)]
pub struct FakeResponse {
    pub status: Option<u16>,
    pub body: Result<String>,
    pub delay: Duration,
}

impl FakeResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: Some(200),
            body: Ok(body.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            body: Ok(String::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn error(error: GramfeedError) -> Self {
        Self {
            status: None,
            body: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Inner {
    routes: Mutex<HashMap<String, VecDeque<FakeResponse>>>,
    navigations: Mutex<Vec<String>>,
    pages_opened: AtomicUsize,
    pages_released: AtomicUsize,
    close_calls: AtomicUsize,
    closed: AtomicBool,
    after_close: AtomicUsize,
}

/// In-memory browser session with per-URL scripted responses.
///
/// Each URL holds a queue of responses; the last one repeats once the
/// queue is drained.
#[derive(Clone, Default)]
pub struct FakeSession {
    inner: Arc<Inner>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, response: FakeResponse) -> Self {
        self.inner
            .routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.inner.navigations.lock().unwrap().clone()
    }

    pub fn navigation_count(&self, url: &str) -> usize {
        self.navigations().iter().filter(|u| *u == url).count()
    }

    pub fn pages_opened(&self) -> usize {
        self.inner.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_released(&self) -> usize {
        self.inner.pages_released.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.inner.close_calls.load(Ordering::SeqCst)
    }

    /// Navigations attempted after the session was closed
    pub fn fetches_after_close(&self) -> usize {
        self.inner.after_close.load(Ordering::SeqCst)
    }

    fn next_response(&self, url: &str) -> FakeResponse {
        let mut routes = self.inner.routes.lock().unwrap();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| FakeResponse::error(GramfeedError::Browser("empty route".into()))),
            None => FakeResponse::error(GramfeedError::Browser(format!("no route for {}", url))),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        if self.inner.closed.load(Ordering::SeqCst) {
            self.inner.after_close.fetch_add(1, Ordering::SeqCst);
            return Err(GramfeedError::Browser("Browser session already closed".into()));
        }
        self.inner.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            session: self.clone(),
            body: None,
            released: false,
        }))
    }

    async fn close(&self) -> Result<()> {
        self.inner.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    session: FakeSession,
    body: Option<String>,
    released: bool,
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn navigate(&mut self, url: &str, _headers: &[(&'static str, String)]) -> Result<Option<u16>> {
        if self.session.inner.closed.load(Ordering::SeqCst) {
            self.session.inner.after_close.fetch_add(1, Ordering::SeqCst);
            return Err(GramfeedError::Browser("Browser session already closed".into()));
        }
        self.session
            .inner
            .navigations
            .lock()
            .unwrap()
            .push(url.to_string());

        let response = self.session.next_response(url);
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        self.body = Some(response.body?);
        Ok(response.status)
    }

    async fn content(&mut self) -> Result<String> {
        self.body
            .clone()
            .ok_or_else(|| GramfeedError::Browser("no document loaded".into()))
    }

    async fn close(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.session.inner.pages_released.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
