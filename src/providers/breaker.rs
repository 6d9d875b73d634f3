//! Per-provider circuit breaker.
//!
//! Guards the retry wrapper: after `failure_threshold` consecutive
//! failures a provider's circuit opens and calls against it fail fast.
//! After `recovery_timeout` the circuit half-opens, letting exactly the
//! next caller through as a trial; success closes it, failure re-opens.
//!
//! State is process-local and never persisted — a restart resets every
//! provider to Closed. Multiple gateway instances behind a load balancer
//! each keep their own breaker state; only the cache may be shared.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::telemetry;

/// Circuit state for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Normal operation — calls pass through.
    Closed,
    /// Failing — calls rejected immediately.
    Open,
    /// Cooldown elapsed — exactly one trial call permitted.
    HalfOpen,
}

/// Configuration for circuit-breaker behaviour.
///
/// ```rust
/// # use bifrost::BreakerConfig;
/// # use std::time::Duration;
/// let config = BreakerConfig::new()
///     .failure_threshold(5)
///     .recovery_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens. Default: 3.
    pub failure_threshold: u32,
    /// Cooldown before an open circuit half-opens. Default: 60s.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

impl BreakerConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the consecutive-failure threshold.
    pub fn failure_threshold(mut self, n: u32) -> Self {
        self.failure_threshold = n;
        self
    }

    /// Set the cooldown before an open circuit half-opens.
    pub fn recovery_timeout(mut self, timeout: Duration) -> Self {
        self.recovery_timeout = timeout;
        self
    }
}

#[derive(Debug)]
struct ProviderState {
    failures: u32,
    state: BreakerState,
    last_failure: Option<Instant>,
}

impl ProviderState {
    fn new() -> Self {
        Self {
            failures: 0,
            state: BreakerState::Closed,
            last_failure: None,
        }
    }
}

/// Circuit breaker over a set of named providers.
///
/// One coarse mutex guards all provider state: every operation is an
/// O(1) read-modify-write, held nowhere near a provider call, so a burst
/// of requests against an open circuit fast-fails without serializing
/// behind an in-flight slow call. Failures against provider A never
/// affect provider B; state is created lazily on first reference.
pub struct CircuitBreaker {
    providers: Mutex<HashMap<String, ProviderState>>,
    config: BreakerConfig,
}

impl CircuitBreaker {
    /// Create a breaker with the given configuration.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            providers: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Record a successful call: failure count resets, circuit closes,
    /// from any prior state.
    pub fn record_success(&self, provider: &str) {
        let mut providers = self.providers.lock().expect("breaker mutex poisoned");
        let entry = providers
            .entry(provider.to_string())
            .or_insert_with(ProviderState::new);
        if entry.state != BreakerState::Closed {
            info!(provider, "circuit closed after successful call");
            metrics::counter!(telemetry::BREAKER_TRANSITIONS_TOTAL,
                "provider" => provider.to_owned(), "to" => "closed")
            .increment(1);
        }
        entry.failures = 0;
        entry.state = BreakerState::Closed;
        entry.last_failure = None;
    }

    /// Record a failed call. Both transient and permanent failures count:
    /// any failure is evidence the provider is unhealthy.
    pub fn record_failure(&self, provider: &str) {
        let mut providers = self.providers.lock().expect("breaker mutex poisoned");
        let entry = providers
            .entry(provider.to_string())
            .or_insert_with(ProviderState::new);
        entry.failures += 1;
        entry.last_failure = Some(Instant::now());
        match entry.state {
            BreakerState::Closed if entry.failures >= self.config.failure_threshold => {
                warn!(
                    provider,
                    failures = entry.failures,
                    "circuit opened after consecutive failures"
                );
                entry.state = BreakerState::Open;
                metrics::counter!(telemetry::BREAKER_TRANSITIONS_TOTAL,
                    "provider" => provider.to_owned(), "to" => "open")
                .increment(1);
            }
            BreakerState::HalfOpen => {
                warn!(provider, "trial call failed, circuit re-opened");
                entry.state = BreakerState::Open;
                metrics::counter!(telemetry::BREAKER_TRANSITIONS_TOTAL,
                    "provider" => provider.to_owned(), "to" => "open")
                .increment(1);
            }
            _ => {
                debug!(
                    provider,
                    failures = entry.failures,
                    threshold = self.config.failure_threshold,
                    "failure recorded"
                );
            }
        }
    }

    /// Whether calls to the provider should be rejected.
    ///
    /// This is also the state-refresh point: an Open circuit whose
    /// cooldown has elapsed transitions to HalfOpen here and returns
    /// `false`, permitting exactly the next caller through as a trial.
    pub fn is_open(&self, provider: &str) -> bool {
        let mut providers = self.providers.lock().expect("breaker mutex poisoned");
        let entry = providers
            .entry(provider.to_string())
            .or_insert_with(ProviderState::new);
        match entry.state {
            BreakerState::Closed | BreakerState::HalfOpen => false,
            BreakerState::Open => {
                let elapsed = entry
                    .last_failure
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::MAX);
                if elapsed >= self.config.recovery_timeout {
                    info!(provider, "cooldown elapsed, circuit half-open");
                    entry.state = BreakerState::HalfOpen;
                    metrics::counter!(telemetry::BREAKER_TRANSITIONS_TOTAL,
                        "provider" => provider.to_owned(), "to" => "half_open")
                    .increment(1);
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Current state of a provider's circuit (Closed for unseen providers).
    pub fn state(&self, provider: &str) -> BreakerState {
        self.providers
            .lock()
            .expect("breaker mutex poisoned")
            .get(provider)
            .map(|e| e.state)
            .unwrap_or(BreakerState::Closed)
    }

    /// Current failure count for a provider (0 for unseen providers).
    pub fn failure_count(&self, provider: &str) -> u32 {
        self.providers
            .lock()
            .expect("breaker mutex poisoned")
            .get(provider)
            .map(|e| e.failures)
            .unwrap_or(0)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}
