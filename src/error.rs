//! Bifrost error types

use std::time::Duration;

/// Bifrost error types
#[derive(Debug, thiserror::Error)]
pub enum BifrostError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Synthetic rejection raised by the façade when a provider's circuit
    /// is open. Never produced by a provider; callers can match on it to
    /// pick a degraded fallback instead of treating it as a remote failure.
    #[error("circuit open for provider {provider}")]
    CircuitOpen { provider: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("no provider configured")]
    NoProvider,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },
}

/// Message substrings that mark an otherwise-unclassified error as transient.
const TRANSIENT_MARKERS: &[&str] = &[
    "rate limit",
    "429",
    "503",
    "502",
    "500",
    "overloaded",
    "temporarily unavailable",
    "timeout",
    "connection",
];

impl BifrostError {
    /// Whether this failure is worth retrying.
    ///
    /// Rules, in order: rate limits and 5xx-family API statuses are
    /// transient; anything else is scanned for transient markers in its
    /// lower-cased display string (this catches connect/timeout/IO causes
    /// carried in `Http`, and vendor overload messages on non-standard
    /// statuses such as Anthropic's 529). Total and deterministic — never
    /// panics.
    ///
    /// `CircuitOpen` is deliberately not transient: retrying against an
    /// open circuit would defeat the breaker.
    pub fn is_transient(&self) -> bool {
        match self {
            BifrostError::RateLimited { .. } => true,
            BifrostError::Api { status, .. } if matches!(status, 429 | 500 | 502 | 503) => true,
            BifrostError::CircuitOpen { .. } => false,
            _ => {
                let msg = self.to_string().to_lowercase();
                TRANSIENT_MARKERS.iter().any(|m| msg.contains(m))
            }
        }
    }

    /// Provider-supplied retry hint, if any.
    ///
    /// Only `RateLimited` errors carry one (parsed from a `retry-after`
    /// header); the retry wrapper prefers it over calculated backoff.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BifrostError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BifrostError {
    fn from(err: reqwest::Error) -> Self {
        // Preserve the transport's cause in the message so the transient
        // classifier can key on "timeout" / "connection".
        if err.is_timeout() {
            BifrostError::Http(format!("timeout: {err}"))
        } else if err.is_connect() {
            BifrostError::Http(format!("connection failed: {err}"))
        } else {
            BifrostError::Http(err.to_string())
        }
    }
}

/// Result type alias for Bifrost operations
pub type Result<T> = std::result::Result<T, BifrostError>;
