//! Virtual machine health.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::api::{InstanceView, ManagementApi, Timespan, VirtualMachine};
use crate::config::MonitorConfig;

pub const CPU_METRIC: &str = "Percentage CPU";
pub const MEMORY_METRIC: &str = "Available Memory Bytes";
pub const DISK_READ_METRIC: &str = "Disk Read Bytes";
pub const DISK_WRITE_METRIC: &str = "Disk Write Bytes";

const POWER_STATE_PREFIX: &str = "PowerState/";
const UNKNOWN: &str = "Unknown";

/// Overall VM status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmStatus {
    Healthy,
    Warning,
    Error,
}

impl VmStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-hour metric averages. `None` when the platform reported no data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VmMetrics {
    pub cpu_percent: Option<f64>,
    pub memory_available_bytes: Option<f64>,
    pub disk_read_bytes: Option<f64>,
    pub disk_write_bytes: Option<f64>,
}

/// Health row for one VM.
#[derive(Debug, Clone, PartialEq)]
pub struct VmHealth {
    pub name: String,
    pub id: String,
    pub location: String,
    pub vm_size: String,
    pub power_state: String,
    pub os_type: String,
    pub metrics: VmMetrics,
    pub alerts: Vec<String>,
    pub status: VmStatus,
    /// Why the row is in [`VmStatus::Error`].
    pub error: Option<String>,
}

impl VmHealth {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.power_state == "running"
    }
}

/// Power state from the `PowerState/<state>` status code.
#[must_use]
pub fn power_state(view: &InstanceView) -> String {
    view.statuses
        .iter()
        .find_map(|s| s.code.strip_prefix(POWER_STATE_PREFIX))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Threshold alerts raised by a set of metrics.
#[must_use]
pub fn evaluate_alerts(metrics: &VmMetrics, cpu_threshold: f64) -> Vec<String> {
    let mut alerts = Vec::new();
    if let Some(cpu) = metrics.cpu_percent {
        if cpu > cpu_threshold {
            alerts.push(format!(
                "CPU usage ({cpu:.1}%) exceeds threshold ({cpu_threshold}%)"
            ));
        }
    }
    alerts
}

async fn metric(
    api: &dyn ManagementApi,
    vm: &VirtualMachine,
    name: &str,
    timespan: &Timespan,
) -> Option<f64> {
    match api.metric_average(&vm.id, name, timespan).await {
        Ok(value) => value,
        Err(e) => {
            warn!(vm = %vm.name, metric = name, error = %e, "Metric unavailable");
            None
        }
    }
}

async fn vm_metrics(
    api: &dyn ManagementApi,
    vm: &VirtualMachine,
    timespan: &Timespan,
) -> VmMetrics {
    VmMetrics {
        cpu_percent: metric(api, vm, CPU_METRIC, timespan).await,
        memory_available_bytes: metric(api, vm, MEMORY_METRIC, timespan).await,
        disk_read_bytes: metric(api, vm, DISK_READ_METRIC, timespan).await,
        disk_write_bytes: metric(api, vm, DISK_WRITE_METRIC, timespan).await,
    }
}

async fn inspect_vm(
    api: &dyn ManagementApi,
    config: &MonitorConfig,
    vm: VirtualMachine,
    timespan: &Timespan,
) -> VmHealth {
    let vm_size = vm.vm_size().unwrap_or(UNKNOWN).to_string();
    let os_type = vm.os_type().unwrap_or(UNKNOWN).to_string();

    let view = match api.vm_instance_view(&config.resource_group, &vm.name).await {
        Ok(view) => view,
        Err(e) => {
            error!(vm = %vm.name, error = %e, "Failed to read VM status");
            return VmHealth {
                name: vm.name,
                id: vm.id,
                location: vm.location,
                vm_size,
                power_state: UNKNOWN.to_string(),
                os_type,
                metrics: VmMetrics::default(),
                alerts: Vec::new(),
                status: VmStatus::Error,
                error: Some(e.to_string()),
            };
        }
    };

    let metrics = vm_metrics(api, &vm, timespan).await;
    let alerts = evaluate_alerts(&metrics, config.cpu_threshold);
    let status = if alerts.is_empty() {
        VmStatus::Healthy
    } else {
        VmStatus::Warning
    };

    let health = VmHealth {
        power_state: power_state(&view),
        name: vm.name,
        id: vm.id,
        location: vm.location,
        vm_size,
        os_type,
        metrics,
        alerts,
        status,
        error: None,
    };
    info!(
        vm = %health.name,
        power_state = %health.power_state,
        status = %health.status,
        "VM inspected"
    );
    health
}

/// Inspects every VM in the configured resource group over the hour ending at `now`.
///
/// A VM whose status cannot be read becomes an [`VmStatus::Error`] row. A failed
/// listing yields no rows.
#[instrument(skip(api, config), fields(resource_group = %config.resource_group))]
pub async fn collect_vm_health(
    api: &dyn ManagementApi,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> Vec<VmHealth> {
    let vms = match api.list_virtual_machines(&config.resource_group).await {
        Ok(vms) => vms,
        Err(e) => {
            error!(error = %e, "Failed to list virtual machines");
            return Vec::new();
        }
    };
    if vms.is_empty() {
        warn!("No virtual machines found");
        return Vec::new();
    }

    let timespan = Timespan::last_hour(now);
    let mut rows = Vec::with_capacity(vms.len());
    for vm in vms {
        rows.push(inspect_vm(api, config, vm, &timespan).await);
    }
    rows
}
