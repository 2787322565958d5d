//! Per-record and per-batch outcomes.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;

use crate::record::OnboardingRecord;

/// Manual minutes one onboarding takes without automation.
pub const MINUTES_SAVED_PER_USER: u64 = 43;

/// Outcome of onboarding one record.
///
/// Created when the record's workflow starts and finalized when it
/// terminates. `success` implies `account_created && license_assigned`.
#[derive(Debug, Clone, Default)]
pub struct OnboardingResult {
    pub principal_name: String,
    pub success: bool,
    pub account_created: bool,
    pub license_assigned: bool,
    /// Group name to whether membership was established.
    pub groups: HashMap<String, bool>,
    pub mailbox_configured: bool,
    /// Set only when the account survives the workflow.
    pub temp_credential: Option<SecretString>,
    /// Reasons the workflow failed. Empty on success.
    pub errors: Vec<String>,
    /// Incomplete best-effort steps and manual follow-ups.
    pub notes: Vec<String>,
}

impl OnboardingResult {
    #[must_use]
    pub fn new(principal_name: impl Into<String>) -> Self {
        Self {
            principal_name: principal_name.into(),
            ..Default::default()
        }
    }

    /// Group names whose membership could not be established, in `order`.
    #[must_use]
    pub fn failed_groups<'a>(&self, order: &'a [String]) -> Vec<&'a str> {
        order
            .iter()
            .filter(|name| self.groups.get(*name) == Some(&false))
            .map(String::as_str)
            .collect()
    }
}

/// A record together with its outcome.
#[derive(Debug, Clone)]
pub struct ProcessedRecord {
    pub record: OnboardingRecord,
    pub result: OnboardingResult,
}

/// Outcomes of a batch, partitioned in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub successes: Vec<ProcessedRecord>,
    pub failures: Vec<ProcessedRecord>,
    pub duration: Duration,
}

impl BatchSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Percentage of records that succeeded, 0 for an empty batch.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.successes.len() as f64 / total as f64 * 100.0
    }

    /// Estimated manual minutes saved.
    #[must_use]
    pub fn minutes_saved(&self) -> u64 {
        self.successes.len() as u64 * MINUTES_SAVED_PER_USER
    }

    /// Estimated manual hours saved.
    #[must_use]
    pub fn hours_saved(&self) -> f64 {
        self.minutes_saved() as f64 / 60.0
    }
}
