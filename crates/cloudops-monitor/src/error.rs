//! Error types for the health monitor.

use cloudops_azure::{AzureError, ConfigError};
use thiserror::Error;

/// Errors that abort a monitoring run.
///
/// Individual data sources degrade to empty or unavailable sections instead
/// of failing, so only setup and output problems surface here.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Azure(#[from] AzureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report rendering failed: {0}")]
    Report(String),
}

impl From<handlebars::RenderError> for MonitorError {
    fn from(e: handlebars::RenderError) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<handlebars::TemplateError> for MonitorError {
    fn from(e: handlebars::TemplateError) -> Self {
        Self::Report(e.to_string())
    }
}
