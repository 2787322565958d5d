//! Azure health dashboard.
//!
//! Collects a resource inventory, VM power state and metrics, and active
//! security alerts for one subscription, then renders them as a static HTML
//! page. Each source degrades independently: a failed call leaves its section
//! empty or marked unavailable instead of aborting the run.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cloudops_azure::AzureConfig;
//! use cloudops_monitor::{Monitor, MonitorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = Monitor::from_config(&AzureConfig::from_env()?, MonitorConfig::from_env()?)?;
//! let report = monitor.collect(chrono::Utc::now()).await;
//! report.write_dashboard(Path::new("output/azure_health_report.html"))?;
//! # Ok(())
//! # }
//! ```

mod api;
mod arm;
mod config;
mod error;
mod inventory;
mod monitor;
mod report;
mod security;
mod vm;

pub use api::{
    GenericResource, HardwareProfile, InstanceStatus, InstanceView, ManagementApi, OsDisk,
    SecurityAlert, SecurityAlertProperties, StorageProfile, Timespan, VirtualMachine,
    VmProperties,
};
pub use arm::{ArmClient, METRIC_INTERVAL};
pub use config::{MonitorConfig, DEFAULT_CPU_THRESHOLD};
pub use error::MonitorError;
pub use inventory::{
    collect_inventory, group_by_type, resource_group_of, ResourceSummary, ResourceTypeGroup,
};
pub use monitor::{HealthReport, Monitor};
pub use report::{render_dashboard, MAX_ROWS_PER_TYPE, MAX_TAGS_PER_ROW};
pub use security::{collect_security_status, ActiveAlert, SecurityStatus};
pub use vm::{
    collect_vm_health, evaluate_alerts, power_state, VmHealth, VmMetrics, VmStatus, CPU_METRIC,
    DISK_READ_METRIC, DISK_WRITE_METRIC, MEMORY_METRIC,
};
