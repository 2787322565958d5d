//! Backoff policy for throttled and transiently failing requests.

use std::time::Duration;

use rand::Rng;

/// Retry policy applied by [`RestClient`](crate::RestClient).
#[derive(Debug, Clone)]
pub struct ThrottlePolicy {
    /// Base delay for exponential backoff in milliseconds (default: 1000ms).
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds (default: 120000ms).
    pub max_delay_ms: u64,
    /// Jitter factor as a fraction of delay (default: 0.25).
    pub jitter_factor: f64,
    /// Retries allowed on 429 responses (default: 5).
    pub max_throttle_retries: u32,
    /// Retries allowed on 502/503/504 responses (default: 5).
    pub max_transient_retries: u32,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_delay_ms: 120_000,
            jitter_factor: 0.25,
            max_throttle_retries: 5,
            max_transient_retries: 5,
        }
    }
}

impl ThrottlePolicy {
    /// Creates a policy optimized for testing (millisecond delays).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_delay_ms: 5,
            max_delay_ms: 50,
            jitter_factor: 0.0,
            max_throttle_retries: 2,
            max_transient_retries: 2,
        }
    }

    /// Validates the policy.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_delay_ms == 0 {
            return Err("base_delay_ms must be > 0".to_string());
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err("max_delay_ms must be >= base_delay_ms".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err("jitter_factor must be in range [0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Parses a `Retry-After` header. Only the delta-seconds form is supported.
    #[must_use]
    pub fn parse_retry_after(header_value: &str) -> Option<u64> {
        header_value.trim().parse::<u64>().ok()
    }

    /// Exponential delay for the given zero-based attempt: `base * 2^attempt`, capped.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt);
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// Delay to wait after a 429, honouring `Retry-After` when present.
    #[must_use]
    pub fn throttle_delay(&self, retry_after_secs: Option<u64>, attempt: u32) -> Duration {
        let delay = match retry_after_secs {
            Some(secs) => Duration::from_secs(secs).min(Duration::from_millis(self.max_delay_ms)),
            None => self.backoff_delay(attempt),
        };
        self.add_jitter(delay)
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }
        let delay_ms = delay.as_millis() as f64;
        let jitter = rand::thread_rng().gen_range(0.0..=delay_ms * self.jitter_factor);
        Duration::from_millis((delay_ms + jitter) as u64)
    }
}
