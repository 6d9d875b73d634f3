//! Response cache for resilient calls.
//!
//! Cache entries are keyed on a stable content hash of
//! (prompt, system prompt, model) — see [`response_key`]. The cache
//! sits in the façade between the circuit-breaker check and the retry
//! wrapper: a hit bypasses retry, provider selection, breaker bookkeeping,
//! and cost tracking entirely.
//!
//! # Backend swappability
//!
//! Callers depend only on the [`CacheBackend`] contract. The default
//! backend is the in-process [`MemoryCache`]; a shared external store
//! (e.g. redis-backed, for multiple gateway instances) can be injected
//! through [`BifrostBuilder::cache_backend`](crate::BifrostBuilder::cache_backend)
//! without changing caller code. The single documented difference: an
//! external backend with native expiry may implement `cleanup()` as a
//! no-op returning 0.

mod key;
mod memory;

use std::time::Duration;

use async_trait::async_trait;

pub use key::response_key;
pub use memory::MemoryCache;

/// Storage contract the façade depends on.
///
/// All operations are infallible from the caller's perspective — a
/// backend that loses an entry just produces a miss.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Look up a value. Expired entries behave identically to misses.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with the given time-to-live.
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Remove a single entry.
    async fn delete(&self, key: &str);

    /// Remove all entries.
    async fn clear(&self);

    /// Sweep expired entries, returning how many were removed.
    ///
    /// Backends with native expiry may return 0 without sweeping.
    async fn cleanup(&self) -> usize;
}

/// Configuration for the in-process cache.
///
/// ```rust
/// # use bifrost::CacheConfig;
/// let config = CacheConfig::new().max_entries(500);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1000.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }
}
