//! Shared Cache Module
//!
//! Thread-safe facade over [`CacheStore`] keyed by (tenant, model, prompt).

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheKey, CacheStats, CacheStore, Clock};
use crate::error::Result;

// == Prompt Cache ==
/// Bounded response cache safe to share between threads.
///
/// Every operation runs under one mutex for its whole duration. Keys are
/// derived before the lock is taken. Share with `Arc<PromptCache<V>>`.
#[derive(Debug)]
pub struct PromptCache<V> {
    inner: Mutex<CacheStore<V>>,
}

impl<V> PromptCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(CacheStore::new(capacity)?),
        })
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(CacheStore::with_clock(capacity, clock)?),
        })
    }

    // == Set ==
    /// Caches `value` for the request for `ttl_seconds`.
    ///
    /// Negative TTLs are rejected with `InvalidArgument`.
    pub fn set(
        &self,
        tenant_id: &str,
        model: &str,
        prompt: &str,
        value: V,
        ttl_seconds: i64,
    ) -> Result<()> {
        let key = CacheKey::derive(tenant_id, model, prompt);
        self.set_key(key, value, ttl_seconds)
    }

    /// Same as [`set`](Self::set) with a precomputed key.
    pub fn set_key(&self, key: CacheKey, value: V, ttl_seconds: i64) -> Result<()> {
        self.inner.lock().set(key, value, ttl_seconds)
    }

    // == Get ==
    /// Returns a copy of the cached value, or `None` on a miss or expiry.
    pub fn get(&self, tenant_id: &str, model: &str, prompt: &str) -> Option<V>
    where
        V: Clone,
    {
        let key = CacheKey::derive(tenant_id, model, prompt);
        self.get_key(&key)
    }

    pub fn get_key(&self, key: &CacheKey) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    // == Delete ==
    /// Removes the entry for the request if present. Returns whether
    /// anything was removed.
    pub fn delete(&self, tenant_id: &str, model: &str, prompt: &str) -> bool {
        let key = CacheKey::derive(tenant_id, model, prompt);
        self.delete_key(&key)
    }

    pub fn delete_key(&self, key: &CacheKey) -> bool {
        self.inner.lock().delete(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.inner.lock().assert_consistent();
    }
}
