//! Workflow timing for the onboarding pipeline.

use std::time::Duration;

/// Bounded retry schedule: `max_attempts` tries, sleeping `initial_delay`
/// after the first failure and doubling after each further failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based), or `None` after the last one.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        Some(self.initial_delay * 2_u32.saturating_pow(attempt - 1))
    }
}

/// Timing constants for the onboarding workflow.
///
/// The defaults match what the directory service needs in production. Tests
/// use [`OnboardingConfig::for_testing`].
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Wait after account creation before touching the new account.
    pub settle_delay: Duration,
    /// Pause between two records of a batch.
    pub inter_record_delay: Duration,
    /// License assignment retries.
    pub license_retry: RetryPolicy,
    /// Usage location set on new accounts (required before licensing).
    pub usage_location: String,
    /// Windows time zone name applied to new mailboxes.
    pub mailbox_time_zone: String,
    /// Locale applied to new mailboxes.
    pub mailbox_locale: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(2),
            inter_record_delay: Duration::from_secs(1),
            license_retry: RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::from_secs(2),
            },
            usage_location: "NL".to_string(),
            mailbox_time_zone: "W. Europe Standard Time".to_string(),
            mailbox_locale: "nl-NL".to_string(),
        }
    }
}

impl OnboardingConfig {
    /// Same workflow with millisecond delays.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            settle_delay: Duration::from_millis(1),
            inter_record_delay: Duration::from_millis(1),
            license_retry: RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::from_millis(2),
            },
            ..Self::default()
        }
    }
}
