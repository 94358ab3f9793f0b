//! Backoff utilities for waiting on remote calls to settle.

use std::time::Duration;

/// Configuration for exponential backoff.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Base interval in milliseconds (default: 2000ms = 2s)
    pub base_interval_ms: u64,
    /// Maximum backoff in milliseconds (default: 30000ms = 30s)
    pub max_backoff_ms: u64,
    /// Maximum exponent for backoff calculation (default: 4, giving max multiplier of 16)
    pub max_exponent: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 2000, // 2 seconds
            max_backoff_ms: 30000,  // 30 seconds
            max_exponent: 4,        // 2^4 = 16x max multiplier
        }
    }
}

impl BackoffConfig {
    /// Create a new backoff config with custom values.
    pub fn new(base_interval_ms: u64, max_backoff_ms: u64, max_exponent: u32) -> Self {
        Self {
            base_interval_ms,
            max_backoff_ms,
            max_exponent,
        }
    }

    /// Create a fast backoff config for quick settles (tests, local mocks).
    pub fn fast() -> Self {
        Self {
            base_interval_ms: 100,
            max_backoff_ms: 1000,
            max_exponent: 3,
        }
    }
}

/// Calculate backoff delay for a given number of consecutive failures.
///
/// Formula: `min(base * 2^min(consecutive-1, max_exponent), max_backoff)`
///
/// # Arguments
///
/// * `config` - Backoff configuration
/// * `consecutive_failures` - Number of consecutive failures (0 = first attempt)
pub fn calculate_backoff(config: &BackoffConfig, consecutive_failures: u32) -> Duration {
    if consecutive_failures == 0 {
        return Duration::from_millis(config.base_interval_ms);
    }

    // Exponent is (consecutive - 1), capped at max_exponent
    let exponent = (consecutive_failures.saturating_sub(1)).min(config.max_exponent);
    let multiplier = 2u64.saturating_pow(exponent);
    let delay_ms = config
        .base_interval_ms
        .saturating_mul(multiplier)
        .min(config.max_backoff_ms);

    Duration::from_millis(delay_ms)
}
