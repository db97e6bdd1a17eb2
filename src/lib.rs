//! Prompt Cache - A bounded LLM-response cache
//!
//! Stores model responses keyed by (tenant, model, normalized prompt) with
//! per-entry TTL expiration and LRU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheKey, PromptCache};
pub use config::Config;
pub use error::{CacheError, Result};
