//! In-memory response cache keyed by request URL.
//!
//! Uses `DashMap` so concurrent readers never contend with each other.
//! Entries are replaced wholesale on every successful fetch and removed only
//! by [`ResponseCache::clear`].

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Last successful decoded payload for one URL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
}

impl CacheEntry {
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Fresh while strictly younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Thread-safe response cache; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Entry value if it is still within `ttl`.
    pub fn get_fresh(&self, key: &str, ttl: Duration) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new();
        cache.insert("/api/symbols", json!(["GOLD"]));

        let ttl = Duration::from_secs(30);
        assert_eq!(cache.get_fresh("/api/symbols", ttl), Some(json!(["GOLD"])));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get_fresh("/api/symbols", ttl), None);
        // Expired entries stay available for stale fallback.
        assert!(cache.get("/api/symbols").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_overwrites_and_resets_age() {
        let cache = ResponseCache::new();
        cache.insert("k", json!(1));
        tokio::time::advance(Duration::from_secs(20)).await;
        cache.insert("k", json!(2));

        let entry = cache.get("k").expect("entry present");
        assert_eq!(entry.value, json!(2));
        assert!(entry.age() < Duration::from_secs(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_drops_everything_and_is_shared() {
        let cache = ResponseCache::new();
        let handle = cache.clone();
        cache.insert("a", json!(1));
        cache.insert("b", json!(2));
        assert_eq!(handle.len(), 2);

        handle.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }
}
