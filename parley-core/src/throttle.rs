//! Jittered backoff for batch drivers
//!
//! The transport retry engine is deterministic; a fleet of tasks hammering
//! one shared quota wants jitter and should honor the wait the server
//! itself suggests. This helper owns both concerns, one level above
//! `generate`.

use std::time::Duration;

use rand::Rng;
use regex::Regex;

use crate::error::LlmError;

/// Backoff policy for rate-limited batch generation
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottlePolicy {
    /// Attempts in total, the first send included
    pub max_attempts: u32,

    /// Floor for suggested waits and base of the exponential fallback
    pub base_delay: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl ThrottlePolicy {
    /// Wait before re-sending after a rate-limited `attempt` (zero-based)
    ///
    /// A wait suggested in the error message wins when it exceeds the
    /// base delay; otherwise exponential backoff from the base. Either
    /// way up to one second of uniform jitter is added so synchronized
    /// tasks fan back out.
    pub fn delay_for_attempt(&self, attempt: u32, error: &LlmError) -> Duration {
        let backoff = match wait_hint(&error.to_string()) {
            Some(hint) => hint.max(self.base_delay),
            None => self.base_delay.mul_f64(2.0_f64.powi(attempt as i32)),
        };
        let jitter = Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0));
        backoff + jitter
    }

    /// Whether `error` on `attempt` (zero-based) warrants another send
    pub fn should_retry(&self, error: &LlmError, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts && is_rate_limited(error)
    }
}

/// Whether an error looks like a rate limit
///
/// Providers are inconsistent here: some return 429 with no body, some a
/// `rate_limit_error` type, some only prose. All three spellings count.
pub fn is_rate_limited(error: &LlmError) -> bool {
    if let LlmError::Http { status: 429, .. } = error {
        return true;
    }
    let text = error.to_string();
    text.contains("429")
        || text.to_lowercase().contains("rate_limit")
        || text.contains("Rate limit")
}

/// Server-suggested wait parsed out of an error message
///
/// Understands the `try again in 498ms` and `try again in 2.5s` forms.
/// Anything unparseable is `None`, which callers turn into exponential
/// backoff.
pub fn wait_hint(message: &str) -> Option<Duration> {
    if !message.contains("try again in") {
        return None;
    }
    let pattern = Regex::new(r"try again in ([\d.]+)(ms|s)").unwrap();
    let caps = pattern.captures(message)?;
    let value: f64 = caps[1].parse().ok()?;
    let seconds = if &caps[2] == "ms" { value / 1000.0 } else { value };
    Duration::try_from_secs_f64(seconds).ok()
}
