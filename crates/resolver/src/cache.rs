//! Resolver-owned memo caches
//!
//! Each cache is a bounded LRU map keyed by the mention string. A cache built
//! without a capacity stores nothing and reports every lookup as a miss.

use lru::LruCache;
use mentionlink_common::metrics;
use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::debug;

/// Hit/miss counters for one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Bounded memo table for a single resolver operation
pub struct MemoCache<V> {
    name: &'static str,
    entries: Option<LruCache<String, V>>,
    hits: u64,
    misses: u64,
}

impl<V: Clone> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries, or a pass-through
    /// cache when `capacity` is None
    pub fn new(name: &'static str, capacity: Option<NonZeroUsize>) -> Self {
        Self {
            name,
            entries: capacity.map(LruCache::new),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a memoized value, refreshing its recency
    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self
            .entries
            .as_mut()
            .and_then(|entries| entries.get(key).cloned());

        let hit = value.is_some();
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        metrics::record_cache(hit, self.name);
        debug!(cache = self.name, key, hit, "Memo cache lookup");

        value
    }

    /// Memoize a value, evicting the least recently used entry when full
    pub fn insert(&mut self, key: &str, value: V) {
        if let Some(entries) = self.entries.as_mut() {
            entries.put(key.to_string(), value);
        }
    }

    /// Drop all entries; counters are kept
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> MemoCache<u32> {
        MemoCache::new("test", NonZeroUsize::new(capacity))
    }

    #[test]
    fn test_hit_and_miss_counting() {
        let mut c = cache(4);
        assert_eq!(c.get("Paris"), None);
        c.insert("Paris", 1);
        assert_eq!(c.get("Paris"), Some(1));
        assert_eq!(
            c.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut c = cache(2);
        c.insert("a", 1);
        c.insert("b", 2);
        assert_eq!(c.get("a"), Some(1));
        c.insert("c", 3);

        assert_eq!(c.len(), 2);
        assert_eq!(c.get("b"), None);
        assert_eq!(c.get("a"), Some(1));
        assert_eq!(c.get("c"), Some(3));
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut c = cache(2);
        c.insert("a", 1);
        c.get("a");
        c.clear();

        assert!(c.is_empty());
        assert_eq!(c.get("a"), None);
        assert_eq!(c.stats().hits, 1);
        assert_eq!(c.stats().misses, 1);
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let mut c = cache(0);
        c.insert("a", 1);
        assert_eq!(c.get("a"), None);
        assert!(c.is_empty());
        assert_eq!(c.stats().misses, 1);
    }
}
