//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Identifies a cached response: who asked, which model, what prompt.
///
/// Used as the body of `POST /get` and `DELETE /del`, and flattened into
/// [`SetRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    pub tenant_id: String,
    pub model: String,
    pub prompt: String,
}

impl LookupRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tenant_id.is_empty() {
            return Some("tenant_id cannot be empty".to_string());
        }
        if self.model.is_empty() {
            return Some("model cannot be empty".to_string());
        }
        None
    }
}

/// Request body for the SET operation (PUT /set)
///
/// `value` is any JSON document; `ttl` falls back to the server default.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    #[serde(flatten)]
    pub lookup: LookupRequest,
    /// The response to cache
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = self.lookup.validate() {
            return Some(error);
        }
        match self.ttl {
            Some(ttl) if ttl < 0 => Some(format!("ttl must be non-negative, got {}", ttl)),
            _ => None,
        }
    }
}
