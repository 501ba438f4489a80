//! Bounded in-memory memoization cache.
//!
//! The flexible character accuracy search compares the same line pairs again and
//! again across its coefficient grid. `MemoCache` remembers those results, keyed by
//! value (two equal inputs hit the same entry regardless of where they came from).
//!
//! The cache is owned by the engine that uses it, never a process-wide global.
//! Memory is bounded by `capacity`: once full, the oldest entry is evicted first.
//! Callers comparing many independent documents should call [`MemoCache::clear`]
//! between document pairs, when no comparison is in flight on the same instance.
//!
//! # Thread Safety
//!
//! State sits behind a `parking_lot::Mutex`, so a cache can be shared by the worker
//! threads of a parallel grid search. Values are computed outside the lock; two
//! threads racing on the same key both compute it and the later insert wins, which
//! is harmless because keys are content-addressed.

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default bound used by the engines.
pub const DEFAULT_CACHE_CAPACITY: usize = 1_000_000;

/// Snapshot of cache occupancy and effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate in percent (0.0-100.0).
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64 * 100.0
    }
}

struct CacheInner<K, V> {
    entries: AHashMap<K, V>,
    order: VecDeque<K>,
}

pub struct MemoCache<K, V> {
    capacity: NonZeroUsize,
    inner: Mutex<CacheInner<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: AHashMap::new(),
                order: VecDeque::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let found = self.inner.lock().entries.get(key).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        if inner.entries.len() >= self.capacity.get()
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.entries.remove(&oldest);
            let evicted = self.evictions.fetch_add(1, Ordering::Relaxed) + 1;
            if evicted.is_power_of_two() {
                tracing::debug!("Memo cache full at {} entries, {} evictions so far", self.capacity, evicted);
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.entries.len();
        inner.entries.clear();
        inner.order.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        tracing::debug!("Cleared memo cache ({} entries)", dropped);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl<K, V> std::fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.inner.lock().entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn cache(cap: usize) -> MemoCache<&'static str, i32> {
        MemoCache::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn test_get_on_empty_returns_none() {
        let cache = cache(2);
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_insert_then_get_hits() {
        let cache = cache(2);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_insert_existing_key_updates_without_growing() {
        let cache = cache(2);
        cache.insert("a", 1);
        cache.insert("a", 9);
        assert_eq!(cache.get(&"a"), Some(9));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_when_capacity_exceeded() {
        let cache = cache(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let cache = cache(4);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            42
        };
        assert_eq!(cache.get_or_insert_with("k", compute), 42);
        assert_eq!(cache.get_or_insert_with("k", || unreachable!()), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let cache = cache(4);
        cache.insert("a", 1);
        cache.get(&"a");
        cache.get(&"b");
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_capacity_one_keeps_last_inserted() {
        let cache = cache(1);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
