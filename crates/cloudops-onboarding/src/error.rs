//! Error taxonomy for the onboarding pipeline.
//!
//! Per-record variants (`Validation` through `Rollback`) never escape the
//! orchestrator: they are logged and folded into the record's
//! [`OnboardingResult`](crate::OnboardingResult). Only the batch-fatal
//! variants abort a run.

use std::path::PathBuf;

use cloudops_azure::AzureError;
use thiserror::Error;

/// Errors raised while onboarding users.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The record failed one or more validation checks.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The directory account could not be created. Nothing to roll back.
    #[error("Account creation failed for {principal_name}: {reason}")]
    Provision {
        principal_name: String,
        reason: String,
    },

    /// A mandatory step failed after the account was created.
    #[error("{step} failed for {principal_name}: {reason}")]
    MandatoryStep {
        step: &'static str,
        principal_name: String,
        reason: String,
    },

    /// A best-effort step failed. Recorded, never fatal.
    #[error("{step} incomplete for {principal_name}: {reason}")]
    BestEffortStep {
        step: &'static str,
        principal_name: String,
        reason: String,
    },

    /// The compensating delete failed; the account is left behind.
    #[error("Rollback of {principal_name} ({account_id}) failed: {source}")]
    Rollback {
        principal_name: String,
        account_id: String,
        #[source]
        source: AzureError,
    },

    /// The tenant's license catalogue could not be read.
    #[error("Failed to resolve tenant license SKUs: {0}")]
    SkuResolution(#[source] AzureError),

    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input or an output file could not be parsed or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTML report could not be rendered.
    #[error("Report rendering failed: {0}")]
    Report(String),
}

impl OnboardingError {
    /// Returns true for errors that abort the whole batch.
    #[must_use]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            Self::SkuResolution(_)
                | Self::InputNotFound(_)
                | Self::Csv(_)
                | Self::Io(_)
                | Self::Report(_)
        )
    }
}

impl From<handlebars::RenderError> for OnboardingError {
    fn from(e: handlebars::RenderError) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<handlebars::TemplateError> for OnboardingError {
    fn from(e: handlebars::TemplateError) -> Self {
        Self::Report(e.to_string())
    }
}
