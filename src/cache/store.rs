//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with an arena-backed LRU list
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, Clock, LruList, SystemClock};
use crate::error::{CacheError, Result};

// == Slot ==
/// What the LRU list stores per entry; the key is kept so eviction can clean
/// up the index.
#[derive(Debug)]
struct Slot<V> {
    key: CacheKey,
    entry: CacheEntry<V>,
}

// == Cache Store ==
/// Single-threaded cache storage with LRU eviction and TTL support.
///
/// `index` maps each key to its handle in `order`; both always hold the same
/// key set and never more than `capacity` entries. Wrap in
/// [`PromptCache`](crate::cache::PromptCache) for shared use.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key to LRU handle
    index: HashMap<CacheKey, usize>,
    /// Entries in recency order
    order: LruList<Slot<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore on the system clock.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, Arc::new(SystemClock::new()))
    }

    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(capacity),
            capacity,
            clock,
        })
    }

    // == Set ==
    /// Stores a value under `key` for `ttl_seconds`.
    ///
    /// An existing entry is replaced in place and becomes most recently used.
    /// A new entry evicts the least recently used one when the cache is full.
    /// A zero TTL stores an entry that is already expired.
    pub fn set(&mut self, key: CacheKey, value: V, ttl_seconds: i64) -> Result<()> {
        let ttl = u64::try_from(ttl_seconds).map_err(|_| {
            CacheError::InvalidArgument(format!(
                "ttl_seconds must be non-negative, got {}",
                ttl_seconds
            ))
        })?;
        let now = self.clock.now_ms();

        // Overwrite case: capacity unchanged
        if let Some(&idx) = self.index.get(&key) {
            if let Some(slot) = self.order.get_mut(idx) {
                slot.entry.refresh(value, now, ttl);
            }
            self.order.touch(idx);
            return Ok(());
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let idx = self.order.push_front(Slot {
            key: key.clone(),
            entry: CacheEntry::new(value, now, ttl),
        });
        self.index.insert(key, idx);
        self.stats.set_total_entries(self.index.len());

        Ok(())
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// A live hit becomes most recently used. An expired entry is removed and
    /// reported as a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();

        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(idx)
            .map_or(true, |slot| slot.entry.is_expired(now));
        if expired {
            self.remove_at(key, idx);
            self.stats.record_expiration();
            debug!(key = %key, "removed expired entry");
            return None;
        }

        self.order.touch(idx);
        self.stats.record_hit();
        self.order.get(idx).map(|slot| slot.entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether an entry was present. Deleting an absent key is not
    /// an error.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.remove_at(key, idx);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Returns the current number of entries, expired ones included until a
    /// lookup removes them.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<CacheKey> {
        self.order.iter().map(|slot| slot.key.clone()).collect()
    }

    fn evict_lru(&mut self) {
        if let Some(slot) = self.order.pop_back() {
            self.index.remove(&slot.key);
            self.stats.record_eviction();
            debug!(key = %slot.key, "evicted least recently used entry");
        }
    }

    fn remove_at(&mut self, key: &CacheKey, idx: usize) {
        self.order.remove(idx);
        self.index.remove(key);
        self.stats.set_total_entries(self.index.len());
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.index.len() <= self.capacity, "over capacity");
        assert_eq!(self.index.len(), self.order.len(), "index/order size mismatch");
        for (key, &idx) in &self.index {
            let slot = self.order.get(idx).expect("index points at a freed slot");
            assert_eq!(&slot.key, key, "index points at the wrong slot");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn key(prompt: &str) -> CacheKey {
        CacheKey::derive("t", "m", prompt)
    }

    fn store_with_clock(capacity: usize) -> (CacheStore<i32>, ManualClock) {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(capacity, Arc::new(clock.clone())).unwrap();
        (store, clock)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<i32> = CacheStore::new(100).unwrap();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_rejected() {
        let result: Result<CacheStore<i32>> = CacheStore::new(0);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100);

        store.set(key("hello"), 1, 60).unwrap();

        assert_eq!(store.get(&key("hello")), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100);
        assert_eq!(store.get(&key("nonexistent")), None);
    }

    #[test]
    fn test_store_negative_ttl_rejected() {
        let (mut store, _) = store_with_clock(100);

        let result = store.set(key("hello"), 1, -1);

        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_negative_ttl_leaves_existing_entry() {
        let (mut store, _) = store_with_clock(100);

        store.set(key("hello"), 1, 60).unwrap();
        assert!(store.set(key("hello"), 2, -5).is_err());

        assert_eq!(store.get(&key("hello")), Some(1));
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock(100);

        store.set(key("hello"), 1, 60).unwrap();
        assert!(store.delete(&key("hello")));

        assert!(store.is_empty());
        assert_eq!(store.get(&key("hello")), None);
        store.assert_consistent();
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let (mut store, _) = store_with_clock(100);
        store.set(key("present"), 1, 60).unwrap();

        assert!(!store.delete(&key("nonexistent")));
        assert!(!store.delete(&key("nonexistent")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with_clock(100);

        store.set(key("hello"), 1, 60).unwrap();
        store.set(key("hello"), 2, 60).unwrap();

        assert_eq!(store.get(&key("hello")), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let (mut store, _) = store_with_clock(2);

        store.set(key("a"), 1, 60).unwrap();
        store.set(key("b"), 2, 60).unwrap();
        store.set(key("a"), 10, 60).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.keys_by_recency(), vec![key("a"), key("b")]);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100);

        store.set(key("hello"), 1, 5).unwrap();

        clock.set_ms(4_999);
        assert_eq!(store.get(&key("hello")), Some(1));

        clock.set_ms(5_001);
        assert_eq!(store.get(&key("hello")), None);
        assert!(store.is_empty());
        store.assert_consistent();
    }

    #[test]
    fn test_store_zero_ttl_expires_on_next_get() {
        let (mut store, _) = store_with_clock(100);

        store.set(key("hello"), 1, 0).unwrap();
        assert_eq!(store.len(), 1);

        assert_eq!(store.get(&key("hello")), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.set(key("hello"), 1, 2).unwrap();
        clock.advance_ms(1_500);
        store.set(key("hello"), 2, 2).unwrap();
        clock.advance_ms(1_500);

        assert_eq!(store.get(&key("hello")), Some(2));
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with_clock(3);

        store.set(key("key1"), 1, 300).unwrap();
        store.set(key("key2"), 2, 300).unwrap();
        store.set(key("key3"), 3, 300).unwrap();

        // Cache is full, adding key4 should evict key1 (oldest)
        store.set(key("key4"), 4, 300).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&key("key1")), None);
        assert_eq!(store.get(&key("key2")), Some(2));
        assert_eq!(store.get(&key("key3")), Some(3));
        assert_eq!(store.get(&key("key4")), Some(4));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(2);

        store.set(key("k1"), 1, 60).unwrap();
        store.set(key("k2"), 2, 60).unwrap();
        store.get(&key("k1"));
        store.set(key("k3"), 3, 60).unwrap();

        assert_eq!(store.get(&key("k1")), Some(1));
        assert_eq!(store.get(&key("k2")), None);
        assert_eq!(store.get(&key("k3")), Some(3));
    }

    #[test]
    fn test_store_capacity_two_scenario() {
        let (mut store, _) = store_with_clock(2);

        store.set(key("hi"), 1, 60).unwrap();
        store.set(key("bye"), 2, 60).unwrap();
        store.set(key("yo"), 3, 60).unwrap();

        assert_eq!(store.keys_by_recency(), vec![key("yo"), key("bye")]);
        assert_eq!(store.get(&key("hi")), None);
        assert_eq!(store.get(&key("bye")), Some(2));
        assert_eq!(store.get(&key("yo")), Some(3));
    }

    #[test]
    fn test_store_expired_miss_does_not_touch_others() {
        let (mut store, clock) = store_with_clock(2);

        store.set(key("short"), 1, 1).unwrap();
        store.set(key("long"), 2, 60).unwrap();
        clock.advance_secs(2);

        assert_eq!(store.get(&key("short")), None);
        assert_eq!(store.keys_by_recency(), vec![key("long")]);
        store.assert_consistent();
    }

    #[test]
    fn test_store_stats() {
        let (mut store, clock) = store_with_clock(1);

        store.set(key("a"), 1, 1).unwrap();
        store.get(&key("a")); // hit
        store.get(&key("missing")); // miss
        store.set(key("b"), 2, 1).unwrap(); // evicts a
        clock.advance_secs(1);
        store.get(&key("b")); // expired

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.capacity, 1);
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock(4);

        store.set(key("a"), 1, 60).unwrap();
        store.set(key("b"), 2, 60).unwrap();
        store.get(&key("a"));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats().hits, 1);
        store.set(key("c"), 3, 60).unwrap();
        store.assert_consistent();
    }

    #[test]
    fn test_store_values_are_copies() {
        let clock = ManualClock::new();
        let mut store: CacheStore<Vec<u8>> =
            CacheStore::with_clock(4, Arc::new(clock)).unwrap();

        store.set(key("a"), vec![1, 2, 3], 60).unwrap();
        let mut value = store.get(&key("a")).unwrap();
        value.push(4);

        assert_eq!(store.get(&key("a")), Some(vec![1, 2, 3]));
    }
}
