//! Exponential backoff with a rate-limit multiplier

use std::time::Duration;

use retrylab_domain::constants::{RATE_LIMIT_MULTIPLIER, RATE_LIMIT_STATUS};
use retrylab_domain::RetryPolicy;

/// Computes `min(base_delay * 2^attempt * m, max_delay)` where `m` is 2 for
/// rate-limited (429) failures and 1 otherwise
///
/// Attempts are zero-indexed: the first retry uses attempt 0. Arithmetic
/// saturates, so large attempt indices settle at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffCalculator {
    base_delay: Duration,
    max_delay: Duration,
}

impl BackoffCalculator {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self { base_delay, max_delay }
    }

    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self::new(policy.base_delay, policy.max_delay)
    }

    /// Delay before the retry that follows `attempt`
    pub fn delay(&self, attempt: u32, status_code: Option<u16>) -> Duration {
        let multiplier =
            if status_code == Some(RATE_LIMIT_STATUS) { RATE_LIMIT_MULTIPLIER } else { 1 };
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);

        let delay_ms = millis(self.base_delay)
            .saturating_mul(factor)
            .saturating_mul(multiplier)
            .min(millis(self.max_delay));

        Duration::from_millis(delay_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
