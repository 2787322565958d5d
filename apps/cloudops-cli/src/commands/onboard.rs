//! Onboard command - Create users from a CSV file

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use cloudops_azure::AzureConfig;
use cloudops_onboarding::{
    console_summary, read_records, run_batch, write_outputs, GraphDirectory, OnboardingConfig,
    Orchestrator,
};
use tracing::{info, warn};

use crate::error::CliResult;
use crate::logging::init_logging;

/// Arguments for the onboard command
#[derive(Args)]
pub struct OnboardArgs {
    /// CSV file with one new hire per row
    #[arg(long, default_value = "./input/users_to_onboard.csv")]
    pub input: PathBuf,

    /// Directory for credentials, failures and the HTML report
    #[arg(long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Execute the onboard command
pub async fn execute(args: OnboardArgs) -> CliResult<()> {
    init_logging(args.log_file.as_deref())?;

    let azure = AzureConfig::from_env()?;
    let records = read_records(&args.input)?;
    info!(input = %args.input.display(), count = records.len(), "Records loaded");
    if records.is_empty() {
        warn!("Input file contains no records");
    }

    let directory = Arc::new(GraphDirectory::from_config(&azure)?);
    let orchestrator = Orchestrator::connect(directory, OnboardingConfig::default()).await?;

    let summary = run_batch(&orchestrator, records).await;
    let paths = write_outputs(&args.output_dir, &summary)?;

    println!();
    println!("{}", console_summary(&summary, &paths));
    Ok(())
}
