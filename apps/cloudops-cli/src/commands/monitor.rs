//! Monitor command - Generate the health dashboard

use std::path::PathBuf;

use clap::Args;
use cloudops_azure::AzureConfig;
use cloudops_monitor::{Monitor, MonitorConfig, VmStatus};

use crate::error::CliResult;
use crate::logging::init_logging;

/// Arguments for the monitor command
#[derive(Args)]
pub struct MonitorArgs {
    /// Path of the generated HTML dashboard
    #[arg(long, default_value = "./output/azure_health_report.html")]
    pub output: PathBuf,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Execute the monitor command
pub async fn execute(args: MonitorArgs) -> CliResult<()> {
    init_logging(args.log_file.as_deref())?;

    let azure = AzureConfig::from_env()?;
    let config = MonitorConfig::from_env()?;
    let monitor = Monitor::from_config(&azure, config)?;

    let report = monitor.collect(chrono::Utc::now()).await;
    report.write_dashboard(&args.output)?;

    let warnings = report
        .vms
        .iter()
        .filter(|vm| vm.status == VmStatus::Warning)
        .count();
    println!();
    println!("HEALTH CHECK SUMMARY");
    println!("Resources:            {}", report.resources.len());
    println!("Virtual machines:     {}", report.vms.len());
    println!("VMs with alerts:      {warnings}");
    println!("Security alerts:      {}", report.security.alerts().len());
    println!("Dashboard:            {}", args.output.display());
    Ok(())
}
