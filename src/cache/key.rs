//! Cache Key Module
//!
//! Derives composite cache keys from (tenant, model, prompt).

use std::fmt;

use sha2::{Digest, Sha256};

/// Length in bytes of the prompt digest.
pub const DIGEST_LEN: usize = 32;

/// Number of hex characters of the digest shown in `Display`.
const DISPLAY_DIGEST_CHARS: usize = 16;

// == Cache Key ==
/// Identity of a cached response.
///
/// Tenant and model are kept verbatim; the prompt is normalized and hashed so
/// keys stay small regardless of prompt length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    tenant_id: String,
    model: String,
    prompt_digest: [u8; DIGEST_LEN],
}

impl CacheKey {
    // == Derive ==
    /// Builds the key for a request.
    ///
    /// Prompts differing only in whitespace runs, leading/trailing whitespace
    /// or letter case produce the same key.
    pub fn derive(tenant_id: &str, model: &str, prompt: &str) -> Self {
        let normalized = normalize_prompt(prompt);
        let mut prompt_digest = [0u8; DIGEST_LEN];
        prompt_digest.copy_from_slice(&Sha256::digest(normalized.as_bytes()));

        Self {
            tenant_id: tenant_id.to_string(),
            model: model.to_string(),
            prompt_digest,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt_digest(&self) -> &[u8; DIGEST_LEN] {
        &self.prompt_digest
    }

    /// Full lowercase hex encoding of the prompt digest.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.prompt_digest)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest = self.digest_hex();
        write!(
            f,
            "{}/{}/{}",
            self.tenant_id,
            self.model,
            &digest[..DISPLAY_DIGEST_CHARS]
        )
    }
}

// == Normalization ==
/// Collapses whitespace runs to single spaces, trims, and lower-cases.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
