//! Cost and token estimation.
//!
//! Pure functions — no clocks, no I/O. Estimates are deliberately rough:
//! they exist for budgeting and dashboards, not billing. Providers report
//! exact usage out-of-band; this module only needs to be monotone and
//! cheap.

use crate::types::CallMetadata;

/// Price per million tokens (USD), keyed by model identifier prefix.
///
/// A model matches the longest prefix in this table; unknown models fall
/// back to [`FALLBACK_PRICE_PER_MILLION`]. Prices are blended (input and
/// output charged at the same rate).
const PRICE_TABLE: &[(&str, f64)] = &[
    ("gemini-2.0-flash", 0.25),
    ("gemini-1.5-flash", 0.15),
    ("gemini-1.5-pro", 2.50),
    ("claude-3-5-haiku", 2.00),
    ("claude-3-5-sonnet", 9.00),
    ("claude-sonnet-4", 9.00),
    ("claude-opus-4", 45.00),
    ("gpt-4o-mini", 0.375),
    ("gpt-4o", 6.25),
    ("gpt-4.1", 5.00),
];

/// Fallback price per million tokens for models absent from the table.
const FALLBACK_PRICE_PER_MILLION: f64 = 1.0;

/// Estimate the token count of a string: `max(1, chars / 4)`.
///
/// The 4-chars-per-token heuristic is standard for English prose; the
/// floor of 1 keeps empty inputs from producing a zero-cost call.
pub fn estimate_tokens(text: &str) -> u64 {
    ((text.chars().count() as u64) / 4).max(1)
}

/// Look up the blended price per million tokens for a model.
pub fn price_per_million(model: &str) -> f64 {
    PRICE_TABLE
        .iter()
        .filter(|(prefix, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, price)| *price)
        .unwrap_or(FALLBACK_PRICE_PER_MILLION)
}

/// Estimate the cost of a call in USD, rounded to 6 decimal places.
pub fn estimate_cost(input_tokens: u64, output_tokens: u64, model: &str) -> f64 {
    let total = (input_tokens + output_tokens) as f64;
    let cost = total / 1_000_000.0 * price_per_million(model);
    (cost * 1e6).round() / 1e6
}

/// Build the metadata record for a completed (non-cached) call.
pub fn call_metadata(
    provider: &str,
    model: &str,
    input_text: &str,
    output_text: &str,
    latency_ms: u64,
) -> CallMetadata {
    let input_tokens_est = estimate_tokens(input_text);
    let output_tokens_est = estimate_tokens(output_text);
    CallMetadata {
        provider: provider.to_string(),
        model: model.to_string(),
        cache_hit: false,
        input_tokens_est,
        output_tokens_est,
        total_tokens_est: input_tokens_est + output_tokens_est,
        cost_estimate_usd: estimate_cost(input_tokens_est, output_tokens_est, model),
        latency_ms,
    }
}
