//! CLI error types and exit codes

use cloudops_azure::{AzureError, ConfigError};
use cloudops_monitor::MonitorError;
use cloudops_onboarding::OnboardingError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success (individual records may still have failed)
/// - 1: Input, output or configuration error
/// - 2: Authentication failed
/// - 3: Network error
/// - 5: Remote API error during setup
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Input(_) | CliError::Io(_) => 1,
            CliError::AuthenticationFailed(_) => 2,
            CliError::Network(_) => 3,
            CliError::Server(_) => 5,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some(
                "Set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET in the environment or a .env file.",
            ),
            CliError::AuthenticationFailed(_) => {
                Some("Check the app registration's client secret and API permissions.")
            }
            CliError::Network(_) => Some("Check your network connection and try again."),
            _ => None,
        }
    }
}

impl From<AzureError> for CliError {
    fn from(e: AzureError) -> Self {
        match e {
            AzureError::Config(_) | AzureError::Url(_) => CliError::Config(e.to_string()),
            AzureError::Auth(_) => CliError::AuthenticationFailed(e.to_string()),
            AzureError::Api { status: 401, .. } => CliError::AuthenticationFailed(e.to_string()),
            AzureError::Http(_) => CliError::Network(e.to_string()),
            AzureError::Api { .. }
            | AzureError::Json(_)
            | AzureError::ForeignHost(_)
            | AzureError::Throttled { .. } => {
                CliError::Server(e.to_string())
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<OnboardingError> for CliError {
    fn from(e: OnboardingError) -> Self {
        match e {
            OnboardingError::SkuResolution(source) => CliError::from(source),
            OnboardingError::InputNotFound(_) | OnboardingError::Csv(_) => {
                CliError::Input(e.to_string())
            }
            OnboardingError::Io(_) | OnboardingError::Report(_) => CliError::Io(e.to_string()),
            other => CliError::Server(other.to_string()),
        }
    }
}

impl From<MonitorError> for CliError {
    fn from(e: MonitorError) -> Self {
        match e {
            MonitorError::Config(source) => CliError::from(source),
            MonitorError::Azure(source) => CliError::from(source),
            MonitorError::Io(_) | MonitorError::Report(_) => CliError::Io(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("Failed to serialize output: {e}"))
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
