//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use crate::cache::MILLIS_PER_SECOND;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Timestamps are milliseconds on the owning cache's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp
    pub created_at: u64,
    /// Expiration timestamp
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl_seconds` after `now_ms`.
    ///
    /// A zero TTL yields an entry that is already expired.
    pub fn new(value: V, now_ms: u64, ttl_seconds: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: expiry_from(now_ms, ttl_seconds),
        }
    }

    // == Refresh ==
    /// Replaces the value and restarts the TTL from `now_ms`.
    pub fn refresh(&mut self, value: V, now_ms: u64, ttl_seconds: u64) {
        self.value = value;
        self.created_at = now_ms;
        self.expires_at = expiry_from(now_ms, ttl_seconds);
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once `now_ms` reaches
    /// `expires_at`, so a zero TTL is expired on write.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}

fn expiry_from(now_ms: u64, ttl_seconds: u64) -> u64 {
    now_ms.saturating_add(ttl_seconds.saturating_mul(MILLIS_PER_SECOND))
}
