//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod key;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{normalize_prompt, CacheKey, DIGEST_LEN};
pub use lru::LruList;
pub use shared::PromptCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Milliseconds per TTL second
pub const MILLIS_PER_SECOND: u64 = 1000;
