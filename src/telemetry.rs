//! Telemetry metric name constants.
//!
//! Centralised metric names for bifrost operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bifrost_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "gemini", "claude", "openai")
//! - `status` — outcome: "ok" or "error"
//! - `direction` — token direction: "input" or "output"
//! - `intent` — classified intent label (orchestrator metrics)

/// Total resilient calls dispatched through the façade.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bifrost_requests_total";

/// Provider request duration in seconds.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "bifrost_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "bifrost_retries_total";

/// Total estimated tokens consumed.
///
/// Labels: `provider`, `direction` ("input" | "output").
pub const TOKENS_TOTAL: &str = "bifrost_tokens_total";

/// Total response cache hits.
///
/// Labels: `provider`.
pub const CACHE_HITS_TOTAL: &str = "bifrost_cache_hits_total";

/// Total response cache misses.
///
/// Labels: `provider`.
pub const CACHE_MISSES_TOTAL: &str = "bifrost_cache_misses_total";

/// Total calls rejected because a provider's circuit was open.
///
/// Labels: `provider`.
pub const BREAKER_REJECTIONS_TOTAL: &str = "bifrost_breaker_rejections_total";

/// Total circuit state transitions.
///
/// Labels: `provider`, `to` ("open" | "half_open" | "closed").
pub const BREAKER_TRANSITIONS_TOTAL: &str = "bifrost_breaker_transitions_total";

/// Total messages routed by the orchestrator.
///
/// Labels: `intent`.
pub const ROUTED_TOTAL: &str = "bifrost_routed_total";
