//! Weather lookup caching with TTL support.
//!
//! This crate provides the bounded in-memory cache that sits between city
//! resolution and the weather provider call, reducing redundant lookups.
//! Entries expire after a TTL (lazily on read, eagerly on a periodic
//! sweep) and the store evicts its oldest entry when full.

#![warn(missing_docs)]

mod cache;
mod shared;

pub use cache::{CacheConfig, CacheConfigBuilder, CacheEntry, CacheStats, WeatherCache};
pub use shared::{SharedCache, SweeperHandle};
