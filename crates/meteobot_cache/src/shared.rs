//! Shared cache handle and background sweeper.

use crate::{CacheStats, WeatherCache};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

/// Process-wide cache handle shared between the message handler and the
/// background sweeper.
///
/// Every operation takes the lock for its full duration, so the
/// evict-then-insert pair in `set` and the check-then-delete pair in
/// `get`/`has` are atomic. The lock is never held across an await point.
#[derive(Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<WeatherCache>>,
}

impl SharedCache {
    /// Wrap a cache in a shared handle.
    pub fn new(cache: WeatherCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// See [`WeatherCache::set`].
    pub fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> bool {
        self.inner.lock().set(key, value, ttl)
    }

    /// See [`WeatherCache::get`].
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key)
    }

    /// See [`WeatherCache::has`].
    pub fn has(&self, key: &str) -> bool {
        self.inner.lock().has(key)
    }

    /// See [`WeatherCache::remove`].
    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().remove(key)
    }

    /// See [`WeatherCache::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// See [`WeatherCache::cleanup`].
    pub fn cleanup(&self) -> usize {
        self.inner.lock().cleanup()
    }

    /// See [`WeatherCache::stats`].
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Spawn the periodic sweep task.
    ///
    /// The sweeper runs independently of request handling on a fixed
    /// interval and is a no-op when nothing has expired. Stop it via the
    /// returned handle during shutdown.
    pub fn spawn_sweeper(&self, sweep_interval: Duration) -> SweeperHandle {
        let cache = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(sweep_interval);
            // First tick fires immediately; skip it so a fresh cache
            // is not swept at startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.cleanup();
            }
        });
        debug!(interval_secs = sweep_interval.as_secs(), "Started cache sweeper");
        SweeperHandle { task }
    }
}

/// Handle to the background sweep task.
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweep task.
    pub fn stop(self) {
        self.task.abort();
        debug!("Stopped cache sweeper");
    }
}
