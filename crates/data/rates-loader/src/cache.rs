//! Time-bounded memoization keyed by resource locator

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Cached value with its fetch time
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// A map whose entries go stale `ttl` after insertion.
///
/// Stale entries are not evicted on read; they are simply reported as
/// missing and overwritten by the next insert.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    /// Like [`TtlCache::get`] with an explicit clock reading
    pub fn get_at<Q>(&self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|e| e.is_fresh(now, self.ttl))
            .map(|e| &e.value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, fetched_at: Instant) {
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    /// Drop the entry for `key`. Returns whether one existed.
    pub fn invalidate<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).is_some()
    }

    /// Number of stored entries, fresh or stale
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

    const URL: &str = "https://example.com/rates.csv";

    #[test]
    fn test_fresh_within_ttl() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(URL.to_string(), 7, t0);

        assert_eq!(cache.get_at(URL, t0), Some(&7));
        assert_eq!(cache.get_at(URL, t0 + Duration::from_secs(59)), Some(&7));
    }

    #[test]
    fn test_stale_at_ttl() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(URL.to_string(), 7, t0);

        assert_eq!(cache.get_at(URL, t0 + Duration::from_secs(60)), None);
        // still stored until overwritten
        assert_eq!(cache.len(), 1);

        cache.insert_at(URL.to_string(), 8, t0 + Duration::from_secs(61));
        assert_eq!(cache.get_at(URL, t0 + Duration::from_secs(62)), Some(&8));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_independent() {
        let mut cache: TtlCache<String, &str> = TtlCache::new(Duration::from_secs(5));
        cache.insert("a".to_string(), "first");
        cache.insert("b".to_string(), "second");

        assert_eq!(cache.get("a"), Some(&"first"));
        assert_eq!(cache.get("b"), Some(&"second"));
        assert_eq!(cache.get("c"), None);
    }

    #[test]
    fn test_invalidate() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert(URL.to_string(), 1);

        assert!(cache.invalidate(URL));
        assert!(!cache.invalidate(URL));
        assert!(cache.is_empty());
        assert_eq!(cache.get(URL), None);
    }

    #[test]
    fn test_clock_before_insert_counts_as_fresh() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(1));
        let t0 = Instant::now();
        cache.insert_at(URL.to_string(), 3, t0 + Duration::from_secs(10));
        assert_eq!(cache.get_at(URL, t0), Some(&3));
    }
}
