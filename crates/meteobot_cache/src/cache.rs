//! Bounded TTL cache implementation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Key namespace prefix for weather lookups.
const CITY_KEY_PREFIX: &str = "weather:";

/// Cache entry with value, expiration, and usage statistics.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: String,
    created_at: Instant,
    expires_at: Instant,
    access_count: u64,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Configuration for the weather cache.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// Default TTL for cached entries (seconds)
    #[serde(default = "default_ttl_secs")]
    default_ttl_secs: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_entries")]
    max_entries: usize,

    /// Interval between background sweeps (seconds)
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_max_entries() -> usize {
    1000
}

fn default_sweep_interval_secs() -> u64 {
    600 // 10 minutes
}

impl CacheConfig {
    /// Default TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Usage statistics for the cache.
///
/// `expired_entries` counts entries past their TTL that no read or sweep
/// has reclaimed yet; `average_age_ms` averages over all stored entries,
/// expired or not.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CacheStats {
    /// Number of entries currently stored
    total_entries: usize,
    /// Configured maximum number of entries
    max_entries: usize,
    /// Stored entries that are past their TTL but not yet swept
    expired_entries: usize,
    /// Sum of access counts across stored entries
    total_access_count: u64,
    /// Average entry age in milliseconds, rounded
    average_age_ms: u64,
}

/// Bounded key-value cache with TTL expiration.
///
/// Expired entries are removed lazily on read and eagerly by
/// [`WeatherCache::cleanup`]. When the store is full, inserting a new key
/// evicts the single oldest entry by creation time, expired or not.
///
/// # Example
///
/// ```
/// use meteobot_cache::{CacheConfig, WeatherCache};
///
/// let mut cache = WeatherCache::new(CacheConfig::default());
/// let key = WeatherCache::generate_city_key("Москва");
///
/// cache.set(&key, "☀️ Погода в Москве".to_string(), None);
/// assert!(cache.get(&key).is_some());
/// ```
pub struct WeatherCache {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry>,
}

impl WeatherCache {
    /// Create a new cache with configuration.
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            default_ttl_secs = config.default_ttl_secs,
            max_entries = config.max_entries,
            "Creating weather cache"
        );
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Store a value under `key`.
    ///
    /// Returns `false` (with a warn log, no panic) for an empty or
    /// whitespace-only key. An existing entry for `key` is replaced
    /// wholesale: fresh timestamps and a reset access count. When the
    /// store is full and `key` is new, the oldest entry by creation time
    /// is evicted first.
    pub fn set(&mut self, key: &str, value: String, ttl: Option<Duration>) -> bool {
        if key.trim().is_empty() {
            tracing::warn!("Rejecting empty cache key");
            return false;
        }

        if self.entries.len() >= self.config.max_entries && !self.entries.contains_key(key) {
            self.evict_oldest();
        }

        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        let now = Instant::now();
        let entry = CacheEntry {
            value,
            created_at: now,
            expires_at: now + ttl,
            access_count: 0,
        };

        self.entries.insert(key.to_string(), entry);
        tracing::debug!(key, ttl_ms = ttl.as_millis() as u64, "Stored cache entry");
        true
    }

    /// Get the value for `key` if present and not expired.
    ///
    /// A read that finds an expired entry deletes it and counts as a
    /// miss. A hit increments the entry's access count.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let entry = match self.entries.get_mut(key) {
            Some(entry) => entry,
            None => {
                tracing::debug!(key, "Cache miss");
                return None;
            }
        };

        if Instant::now() > entry.expires_at {
            self.entries.remove(key);
            tracing::debug!(key, "Cache entry expired");
            return None;
        }

        entry.access_count += 1;
        tracing::debug!(key, access_count = entry.access_count, "Cache hit");
        Some(entry.value.clone())
    }

    /// Check whether `key` is present and not expired.
    ///
    /// Lazily deletes an expired entry like [`WeatherCache::get`], but
    /// does not touch the access count.
    pub fn has(&mut self, key: &str) -> bool {
        let entry = match self.entries.get(key) {
            Some(entry) => entry,
            None => return false,
        };

        if entry.is_expired() {
            self.entries.remove(key);
            return false;
        }

        true
    }

    /// Remove the entry for `key`. Returns whether something was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!(key, "Removed cache entry");
        }
        removed
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Remove every expired entry, returning the count removed.
    ///
    /// This is the only mechanism that reclaims memory for entries that
    /// are never read again; it runs on the background sweep timer.
    pub fn cleanup(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.entries.len(), "Swept expired cache entries");
        }
        removed
    }

    /// Snapshot usage statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut expired_entries = 0;
        let mut total_access_count = 0;
        let mut total_age = Duration::ZERO;

        for entry in self.entries.values() {
            if now > entry.expires_at {
                expired_entries += 1;
            }
            total_access_count += entry.access_count;
            total_age += now.saturating_duration_since(entry.created_at);
        }

        CacheStats {
            total_entries: self.entries.len(),
            max_entries: self.config.max_entries,
            expired_entries,
            total_access_count,
            average_age_ms: average_age_ms(total_age, self.entries.len()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the cache key for a city name.
    ///
    /// Lowercased and trimmed, under a fixed namespace prefix so callers
    /// never hand-roll keys and unrelated namespaces cannot collide.
    pub fn generate_city_key(city: &str) -> String {
        format!("{}{}", CITY_KEY_PREFIX, city.trim().to_lowercase())
    }

    /// Evict the single oldest entry by creation time, even if unexpired.
    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.created_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!(key, "Evicted oldest cache entry");
        }
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Average age in milliseconds, rounded to the nearest integer.
fn average_age_ms(total_age: Duration, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u128;
    ((total_age.as_millis() + count / 2) / count) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_age_rounds_to_nearest() {
        assert_eq!(average_age_ms(Duration::ZERO, 0), 0);
        assert_eq!(average_age_ms(Duration::from_millis(3), 2), 2);
        assert_eq!(average_age_ms(Duration::from_millis(4), 3), 1);
        assert_eq!(average_age_ms(Duration::from_millis(10), 4), 3);
    }
}
