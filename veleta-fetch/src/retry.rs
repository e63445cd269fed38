//! Retry policy for HTTP requests.

use std::time::Duration;

/// Default reset wait in seconds when a 429 carries no usable reset header.
pub const DEFAULT_RATE_LIMIT_RESET_SECS: u64 = 60;

/// Extra second added on top of the server-stated reset time.
pub const RATE_LIMIT_GRACE_SECS: u64 = 1;

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying failed requests.
///
/// Rate-limit waits (HTTP 429) use the server's stated reset value plus a
/// one-second grace, not the exponential schedule; every other transient
/// failure backs off exponentially from `initial_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts. Must be at least 1.
    pub max_retries: u32,
    /// Base delay for the exponential schedule. Must be positive.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Creates a new policy.
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        debug_assert!(max_retries >= 1);
        debug_assert!(!initial_delay.is_zero());
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Returns the backoff delay for a 0-based attempt index:
    /// `initial_delay * 2^attempt_index`.
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt_index)
    }

    /// Returns the wait after a 429: the server-stated reset (or the
    /// default when absent/unparseable) plus one grace second.
    pub fn rate_limit_delay(reset_secs: Option<u64>) -> Duration {
        Duration::from_secs(
            reset_secs.unwrap_or(DEFAULT_RATE_LIMIT_RESET_SECS) + RATE_LIMIT_GRACE_SECS,
        )
    }
}

impl Default for RetryPolicy {
    /// Five attempts starting from a one-second delay, matching the
    /// historical behavior of the ingestion jobs.
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

// ============================================================================
// Tests
// ============================================================================
