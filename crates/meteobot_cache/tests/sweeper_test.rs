//! Tests for the shared handle and background sweeper.

use meteobot_cache::{CacheConfig, SharedCache, WeatherCache};
use std::time::Duration;

#[tokio::test]
async fn test_sweeper_reclaims_expired_entries() {
    let cache = SharedCache::new(WeatherCache::new(CacheConfig::default()));
    cache.set("a", "1".to_string(), Some(Duration::from_millis(20)));
    cache.set("b", "2".to_string(), Some(Duration::from_secs(60)));

    let sweeper = cache.spawn_sweeper(Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(140)).await;
    sweeper.stop();

    // The expired entry was reclaimed without any read touching it.
    assert_eq!(cache.len(), 1);
    assert!(cache.has("b"));
}

#[tokio::test]
async fn test_sweeper_tolerates_empty_cache() {
    let cache = SharedCache::new(WeatherCache::default());

    let sweeper = cache.spawn_sweeper(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(80)).await;
    sweeper.stop();

    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_shared_handle_clones_share_state() {
    let cache = SharedCache::new(WeatherCache::default());
    let other = cache.clone();

    cache.set("a", "1".to_string(), None);
    assert_eq!(other.get("a"), Some("1".to_string()));

    other.clear();
    assert!(cache.is_empty());
}
