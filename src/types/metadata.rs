//! Call metadata returned alongside every resilient call.

use serde::{Deserialize, Serialize};

/// Ephemeral record describing one resilient call.
///
/// Pure return value — the core never persists it; consumers may log it.
/// Cache hits carry zeroed cost/latency/token fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallMetadata {
    pub provider: String,
    pub model: String,
    pub cache_hit: bool,
    pub input_tokens_est: u64,
    pub output_tokens_est: u64,
    pub total_tokens_est: u64,
    pub cost_estimate_usd: f64,
    pub latency_ms: u64,
}

impl CallMetadata {
    /// Metadata for a cache hit: no provider round trip happened, so
    /// cost, latency, and token estimates are all zero.
    pub fn for_cache_hit(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            cache_hit: true,
            input_tokens_est: 0,
            output_tokens_est: 0,
            total_tokens_est: 0,
            cost_estimate_usd: 0.0,
            latency_ms: 0,
        }
    }
}
