//! Logging setup using tracing.
//!
//! Human-readable output goes to stderr. With `--log-file`, the same events
//! are also appended to that file without ANSI colours.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CliError, CliResult};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,cloudops_onboarding=debug,cloudops_monitor=debug";

/// Initialize the tracing subscriber, optionally teeing to `log_file`.
pub fn init_logging(log_file: Option<&Path>) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| CliError::Config(format!("invalid log filter: {e}")))?;

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("logging already initialized: {e}")))?;

    tracing::debug!(filter = DEFAULT_FILTER, "Logging initialized");
    Ok(())
}
