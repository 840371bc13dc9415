//! Keyed memoization with at most one in-flight computation per key.
//!
//! The first caller for a key computes the value while later callers wait on
//! the same result. Successful values stay for the lifetime of the cache.
//! Failures are evicted so a later call can try again.
//!
//! ```rust,ignore
//! let cache = ResourceCache::new();
//! let images = cache
//!     .try_get(&link, || async { fetch_images(&link).await })
//!     .await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::app::Result;

type Outcome<V> = Option<Result<V>>;

enum Slot<V> {
    Pending(watch::Receiver<Outcome<V>>),
    Ready(V),
}

pub struct ResourceCache<V> {
    entries: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> Default for ResourceCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResourceCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it with `compute` on a miss.
    ///
    /// Concurrent calls for a key that is already being computed wait for
    /// that computation instead of starting their own. If the computing
    /// caller is dropped before finishing, one of the waiters takes over.
    pub async fn try_get<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let tx = loop {
            let mut rx = {
                let mut entries = self.lock();
                match entries.get(key) {
                    Some(Slot::Ready(value)) => {
                        debug!("Cache hit for {}", key);
                        return Ok(value.clone());
                    }
                    Some(Slot::Pending(rx)) => rx.clone(),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        entries.insert(key.to_string(), Slot::Pending(rx));
                        break tx;
                    }
                }
            };

            debug!("Waiting for in-flight computation of {}", key);
            let outcome = match rx.wait_for(Option::is_some).await {
                Ok(outcome) => (*outcome).clone(),
                // Computing caller went away without an outcome
                Err(_) => None,
            };
            if let Some(result) = outcome {
                return result;
            }
        };

        let mut guard = PendingGuard {
            cache: self,
            key,
            armed: true,
        };

        let result = compute().await;

        {
            let mut entries = self.lock();
            match &result {
                Ok(value) => {
                    entries.insert(key.to_string(), Slot::Ready(value.clone()));
                }
                Err(e) => {
                    warn!("Evicting {} after failed computation: {}", key, e);
                    entries.remove(key);
                }
            }
        }
        guard.armed = false;

        tx.send_replace(Some(result.clone()));
        result
    }

    /// Whether a completed value is stored for `key`
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.lock().get(key), Some(Slot::Ready(_)))
    }

    /// Number of entries, including ones still being computed
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every completed entry. In-flight computations are left alone.
    pub fn clear(&self) {
        self.lock()
            .retain(|_, slot| matches!(slot, Slot::Pending(_)));
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Removes a pending entry whose computing caller was dropped mid-flight
struct PendingGuard<'a, V> {
    cache: &'a ResourceCache<V>,
    key: &'a str,
    armed: bool,
}

impl<V> Drop for PendingGuard<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut entries = self
            .cache
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if matches!(entries.get(self.key), Some(Slot::Pending(_))) {
            entries.remove(self.key);
        }
    }
}
