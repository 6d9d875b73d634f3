//! Builder for configuring gateway instances

use std::sync::Arc;

use crate::cache::{CacheBackend, CacheConfig, MemoryCache};
use crate::providers::{
    BreakerConfig, CircuitBreaker, ClaudeProvider, GeminiProvider, OpenAiProvider,
    ProviderRegistry, RetryConfig, TextProvider,
};
use crate::{BifrostError, Result};

use super::ResilientClient;

/// Main entry point for creating gateway instances.
pub struct Bifrost;

impl Bifrost {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> BifrostBuilder {
        BifrostBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// Providers are enabled by supplying credentials; an absent credential
/// means that provider is simply unavailable. At least one provider must
/// be configured or `build()` returns `NoProvider`.
pub struct BifrostBuilder {
    gemini_key: Option<String>,
    anthropic_key: Option<String>,
    openai_key: Option<String>,
    extra_providers: Vec<Arc<dyn TextProvider>>,
    retry: RetryConfig,
    breaker: BreakerConfig,
    cache_config: CacheConfig,
    cache_backend: Option<Arc<dyn CacheBackend>>,
}

impl BifrostBuilder {
    pub fn new() -> Self {
        Self {
            gemini_key: None,
            anthropic_key: None,
            openai_key: None,
            extra_providers: Vec::new(),
            retry: RetryConfig::default(),
            breaker: BreakerConfig::default(),
            cache_config: CacheConfig::default(),
            cache_backend: None,
        }
    }

    /// Configure the Gemini provider.
    pub fn gemini(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_key = Some(api_key.into());
        self
    }

    /// Configure the Anthropic provider.
    pub fn anthropic(mut self, api_key: impl Into<String>) -> Self {
        self.anthropic_key = Some(api_key.into());
        self
    }

    /// Configure the OpenAI provider.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Register a custom provider under its own name. Useful for tests
    /// and for self-hosted backends.
    pub fn provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.extra_providers.push(provider);
        self
    }

    /// Pick up provider credentials from the environment
    /// (`GEMINI_API_KEY`, `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`).
    pub fn from_env(mut self) -> Self {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            self.anthropic_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_key = Some(key);
        }
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Set the circuit-breaker configuration.
    pub fn breaker(mut self, config: BreakerConfig) -> Self {
        self.breaker = config;
        self
    }

    /// Configure the default in-process cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Inject a shared cache backend (e.g. an external key-value store).
    ///
    /// Without this, the in-process [`MemoryCache`] is used — callers
    /// never change either way.
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<ResilientClient> {
        let mut registry = ProviderRegistry::new();

        if let Some(key) = self.gemini_key {
            registry.register(Arc::new(GeminiProvider::new(key)));
        }
        if let Some(key) = self.anthropic_key {
            registry.register(Arc::new(ClaudeProvider::new(key)));
        }
        if let Some(key) = self.openai_key {
            registry.register(Arc::new(OpenAiProvider::new(key)));
        }
        for provider in self.extra_providers {
            registry.register(provider);
        }

        if registry.is_empty() {
            return Err(BifrostError::NoProvider);
        }

        let cache = self
            .cache_backend
            .unwrap_or_else(|| Arc::new(MemoryCache::new(&self.cache_config)));

        Ok(ResilientClient {
            registry,
            breaker: CircuitBreaker::new(self.breaker),
            cache,
            retry: self.retry,
        })
    }
}

impl Default for BifrostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
