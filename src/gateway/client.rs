//! Resilient call façade.
//!
//! [`ResilientClient`] is the single entry point consumers use. It
//! composes, in strict order: circuit-breaker check → cache lookup →
//! retrying provider call → breaker bookkeeping → cache store → cost
//! tracking. Side effects are ordered so that a cache hit never touches
//! the breaker or cost tracker, a circuit-open rejection never touches
//! the cache, and every real provider invocation updates exactly one
//! breaker signal (success xor failure).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::cache::{CacheBackend, response_key};
use crate::cost;
use crate::providers::retry::{RetryConfig, with_retry};
use crate::providers::{CircuitBreaker, ProviderRegistry};
use crate::telemetry;
use crate::types::{CallMetadata, Message};
use crate::{BifrostError, Result};

/// Options for one resilient call.
///
/// ```rust
/// # use bifrost::CallOptions;
/// # use std::time::Duration;
/// let opts = CallOptions::new()
///     .system("You are a physics tutor.")
///     .cache_ttl(Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// System prompt, empty for none.
    pub system: String,
    /// Multi-turn history; the prompt is appended as the final user turn.
    pub messages: Option<Vec<Message>>,
    /// Cache responses for this long. `None` disables caching.
    pub cache_ttl: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system prompt.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Set the multi-turn history.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Enable caching with the given TTL.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}

/// Resilient gateway over a set of named providers.
///
/// Construct through [`Bifrost::builder()`](crate::Bifrost::builder).
/// Cheap to share: wrap in an `Arc` and hand clones to agents — breaker
/// and cache state are per-instance, so tests can build isolated clients
/// without cross-test leakage.
pub struct ResilientClient {
    pub(crate) registry: ProviderRegistry,
    pub(crate) breaker: CircuitBreaker,
    pub(crate) cache: Arc<dyn CacheBackend>,
    pub(crate) retry: RetryConfig,
}

impl std::fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ResilientClient {
    /// Call a provider with circuit breaking, caching, retry, and cost
    /// tracking. Returns the response text and per-call metadata.
    ///
    /// # Errors
    ///
    /// [`BifrostError::CircuitOpen`] when the provider's circuit is open
    /// (synthetic, raised before any remote interaction); otherwise the
    /// provider's own error, unwrapped, after retries are exhausted.
    #[instrument(skip(self, prompt, opts), fields(operation = "resilient_call"))]
    pub async fn resilient_call(
        &self,
        provider: &str,
        model: &str,
        prompt: &str,
        opts: &CallOptions,
    ) -> Result<(String, CallMetadata)> {
        // 1. Fail fast on an open circuit: no cache, no provider, no
        //    additional failure recorded.
        if self.breaker.is_open(provider) {
            metrics::counter!(telemetry::BREAKER_REJECTIONS_TOTAL,
                "provider" => provider.to_owned())
            .increment(1);
            return Err(BifrostError::CircuitOpen {
                provider: provider.to_string(),
            });
        }

        // 2. Cache lookup.
        let key = opts
            .cache_ttl
            .map(|_| response_key(prompt, &opts.system, model));
        if let Some(key) = &key {
            if let Some(text) = self.cache.get(key).await {
                debug!(provider, model, "cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL,
                    "provider" => provider.to_owned())
                .increment(1);
                return Ok((text, CallMetadata::for_cache_hit(provider, model)));
            }
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL,
                "provider" => provider.to_owned())
            .increment(1);
        }

        // 3. Retrying provider call. Any escaping error counts as one
        //    breaker failure and re-raises unchanged.
        let backend = self.registry.get(provider)?;
        let start = Instant::now();
        let outcome = with_retry(&self.retry, provider, || {
            backend.call(model, prompt, &opts.system, opts.messages.as_deref())
        })
        .await;

        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                self.breaker.record_failure(provider);
                metrics::counter!(telemetry::REQUESTS_TOTAL,
                    "provider" => provider.to_owned(), "status" => "error")
                .increment(1);
                return Err(e);
            }
        };

        // 4. Success bookkeeping.
        self.breaker.record_success(provider);
        let latency = start.elapsed();

        if let (Some(key), Some(ttl)) = (key, opts.cache_ttl) {
            self.cache.set(&key, text.clone(), ttl).await;
        }

        let input_text = call_input_text(prompt, opts);
        let metadata = cost::call_metadata(
            provider,
            model,
            &input_text,
            &text,
            latency.as_millis() as u64,
        );

        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(), "status" => "ok")
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned())
        .record(latency.as_secs_f64());
        metrics::counter!(telemetry::TOKENS_TOTAL,
            "provider" => provider.to_owned(), "direction" => "input")
        .increment(metadata.input_tokens_est);
        metrics::counter!(telemetry::TOKENS_TOTAL,
            "provider" => provider.to_owned(), "direction" => "output")
        .increment(metadata.output_tokens_est);

        Ok((text, metadata))
    }

    /// The circuit breaker, for introspection and tests.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// The cache backend, for explicit sweeps or clears.
    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }

    /// Names of configured providers.
    pub fn provider_names(&self) -> Vec<&str> {
        self.registry.names()
    }
}

/// Everything the caller sent, for input-token estimation.
fn call_input_text(prompt: &str, opts: &CallOptions) -> String {
    let mut text = String::new();
    text.push_str(&opts.system);
    if let Some(messages) = &opts.messages {
        for m in messages {
            text.push_str(&m.content);
        }
    }
    text.push_str(prompt);
    text
}
