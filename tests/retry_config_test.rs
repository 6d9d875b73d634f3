use std::time::Duration;

use bifrost::RetryConfig;

#[test]
fn defaults_match_documented_policy() {
    let config = RetryConfig::default();
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.initial_delay, Duration::from_secs(1));
    assert_eq!(config.max_delay, Duration::from_secs(30));
}

#[test]
fn builder_methods_chain() {
    let config = RetryConfig::new()
        .max_attempts(5)
        .initial_delay(Duration::from_millis(200))
        .max_delay(Duration::from_secs(10));
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.initial_delay, Duration::from_millis(200));
    assert_eq!(config.max_delay, Duration::from_secs(10));
}

#[test]
fn disabled_means_single_attempt() {
    assert_eq!(RetryConfig::disabled().max_attempts, 1);
}

#[test]
fn exponential_backoff_with_cap() {
    let config = RetryConfig::default();
    assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
    assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
    assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
    assert_eq!(config.delay_for_attempt(3), Duration::from_secs(8));
    assert_eq!(config.delay_for_attempt(4), Duration::from_secs(16));
    // capped from here on
    assert_eq!(config.delay_for_attempt(5), Duration::from_secs(30));
    assert_eq!(config.delay_for_attempt(30), Duration::from_secs(30));
}

#[test]
fn effective_delay_prefers_retry_after() {
    let config = RetryConfig::default();
    assert_eq!(
        config.effective_delay(0, Some(Duration::from_millis(123))),
        Duration::from_millis(123)
    );
    assert_eq!(config.effective_delay(2, None), Duration::from_secs(4));
}
