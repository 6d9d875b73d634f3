//! In-process cache backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheBackend, CacheConfig};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Bounded in-memory cache with TTL.
///
/// Expiry is lazy: a `get` on an expired entry returns a miss and removes
/// the entry as a side effect. When the store is at capacity, `set`
/// evicts the entry with the soonest expiry (not LRU) — the entry
/// closest to dying anyway is the cheapest to lose.
///
/// One mutex guards the backing map; every operation is an O(1)-to-O(n)
/// critical section with no I/O inside, so the lock is never held across
/// an await point.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    max_entries: usize,
}

impl MemoryCache {
    /// Create a cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: config.max_entries.max(1),
        }
    }

    /// Number of live entries, expired or not. Test/introspection helper.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                // Lazy expiry: self-clean on read.
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            // Evict the entry expiring soonest.
            let victim = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                entries.remove(&victim);
            }
        }
        entries.insert(key.to_string(), Entry { value, expires_at });
    }

    async fn delete(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(key);
    }

    async fn clear(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
    }

    async fn cleanup(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }
}
