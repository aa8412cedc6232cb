//! Retry policy for transient generation failures

use std::time::Duration;

use crate::error::LlmError;

/// Backoff schedule for re-sending failed requests
///
/// The schedule is deterministic: callers that fan out many conversations
/// and want jitter layer [`crate::throttle::ThrottlePolicy`] on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Re-sends after the initial attempt; 3 means 4 sends in total
    pub max_retries: u32,

    /// Delay before the first re-send
    pub initial_delay: Duration,

    /// Multiplier applied to the delay after each re-send
    pub exponential_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            exponential_base: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the failure of `attempt` (zero-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.exponential_base.powi(attempt as i32);
        self.initial_delay.mul_f64(factor)
    }

    /// Whether `error` on `attempt` (zero-based) warrants another send
    pub fn should_retry(&self, error: &LlmError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}
