// src/cache.rs
//! In-memory response cache with per-entry TTL and an early-refresh signal.
//!
//! Keys are unbounded; eviction is time-based only. Expired entries are
//! dropped lazily on lookup and are never returned as hits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::upstream::Article;

/// Payload stored per cache key: the full response body minus `fromCache`,
/// so hits and fresh fetches answer with the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedNews {
    pub total_results: u64,
    pub page: u32,
    pub news: Vec<Article>,
}

/// Successful lookup. `stale_soon` is set once the entry is past its
/// refresh threshold but still before hard expiry.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub value: CachedNews,
    pub stale_soon: bool,
}

#[derive(Debug)]
struct Entry {
    value: CachedNews,
    expires_at: Instant,
    refresh_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    refresh_threshold: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration, refresh_threshold: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            refresh_threshold,
        }
    }

    /// Cached value for `key`, or `None` once the entry has expired.
    pub fn get(&self, key: &str) -> Option<CacheHit> {
        let now = Instant::now();
        let mut map = self.inner.lock().expect("cache mutex poisoned");
        match map.get(key) {
            Some(entry) if entry.expires_at > now => Some(CacheHit {
                value: entry.value.clone(),
                stale_soon: now >= entry.refresh_at,
            }),
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, overwriting any prior entry.
    pub fn set(&self, key: &str, value: CachedNews) {
        let now = Instant::now();
        let expires_at = now + self.ttl;
        // refresh threshold wider than the TTL collapses to "stale from insertion"
        let refresh_at = expires_at - self.refresh_threshold.min(self.ttl);
        let mut map = self.inner.lock().expect("cache mutex poisoned");
        map.insert(
            key.to_string(),
            Entry {
                value,
                expires_at,
                refresh_at,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(page: u32) -> CachedNews {
        CachedNews {
            total_results: 42,
            page,
            news: vec![Article {
                title: "Bitcoin climbs".to_string(),
                source: "Reuters".to_string(),
                author: "A. Writer".to_string(),
                published_at: "2025-06-01T08:00:00Z".to_string(),
                url: "https://example.com/btc".to_string(),
            }],
        }
    }

    #[test]
    fn round_trip_within_ttl_returns_value_unchanged() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(5));
        cache.set("bitcoin:relevancy:page1", payload(1));

        let hit = cache.get("bitcoin:relevancy:page1").expect("fresh entry");
        assert_eq!(hit.value, payload(1));
        assert!(!hit.stale_soon);
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(5));
        assert!(cache.get("nothing:publishedAt:page1").is_none());
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(5));
        cache.set("k", payload(1));
        cache.set("k", payload(2));

        let hit = cache.get("k").expect("entry");
        assert_eq!(hit.value.page, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entry_behaves_as_absent() {
        let cache = ResponseCache::new(Duration::from_millis(40), Duration::from_millis(10));
        cache.set("k", payload(1));

        // 5x TTL headroom against slow CI timers
        std::thread::sleep(Duration::from_millis(200));

        assert!(cache.get("k").is_none(), "entry past TTL must be a miss");
        // lazy eviction removed it on lookup
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_inside_refresh_window_is_flagged_stale_soon() {
        // refresh_at lands 50ms after insertion; expiry is comfortably far away
        let cache = ResponseCache::new(Duration::from_secs(2), Duration::from_millis(1950));
        cache.set("k", payload(1));

        std::thread::sleep(Duration::from_millis(200));

        let hit = cache.get("k").expect("still before hard expiry");
        assert!(hit.stale_soon, "entry past refresh threshold must be flagged");
    }
}
