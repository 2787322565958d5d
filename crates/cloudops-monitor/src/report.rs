//! HTML health dashboard.

use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::MonitorError;
use crate::inventory::{group_by_type, ResourceSummary};
use crate::monitor::HealthReport;
use crate::security::SecurityStatus;
use crate::vm::{VmHealth, VmStatus};

/// Rows shown per resource type before collapsing the rest.
pub const MAX_ROWS_PER_TYPE: usize = 20;
/// Tags shown per inventory row.
pub const MAX_TAGS_PER_ROW: usize = 3;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const NOT_AVAILABLE: &str = "N/A";

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Azure Health Dashboard</title>
<style>
body { font-family: "Segoe UI", Arial, sans-serif; margin: 20px; background: #f5f5f5; color: #333; }
.header { background: #0078d4; color: #fff; padding: 20px; border-radius: 8px; }
.cards { display: flex; gap: 16px; margin: 20px 0; }
.card { background: #fff; padding: 16px 24px; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.15); }
.card .value { font-size: 28px; font-weight: bold; }
.healthy { color: #107c10; }
.warning { color: #ca5010; }
.error { color: #d13438; }
table { width: 100%; border-collapse: collapse; background: #fff; margin-bottom: 24px; }
th, td { padding: 8px 12px; border-bottom: 1px solid #ddd; text-align: left; }
th { background: #f0f0f0; }
.more { font-style: italic; color: #666; }
</style>
</head>
<body>
<div class="header">
<h1>Azure Health Dashboard</h1>
<p>Subscription {{subscription_id}} &middot; resource group {{resource_group}} &middot; generated {{generated_at}}</p>
</div>
<div class="cards">
<div class="card"><div class="value">{{total_vms}}</div>Total VMs</div>
<div class="card"><div class="value healthy">{{running_vms}}</div>Running</div>
<div class="card"><div class="value warning">{{vms_with_alerts}}</div>VMs with alerts</div>
<div class="card"><div class="value error">{{active_security_alerts}}</div>Active security alerts</div>
</div>
<h2>Virtual machines</h2>
{{#if vms}}
<table>
<tr><th>Name</th><th>Location</th><th>Size</th><th>OS</th><th>Power state</th><th>CPU</th><th>Available memory</th><th>Disk read</th><th>Disk write</th><th>Status</th><th>Alerts</th></tr>
{{#each vms}}
<tr><td>{{name}}</td><td>{{location}}</td><td>{{vm_size}}</td><td>{{os_type}}</td><td>{{power_state}}</td><td>{{cpu}}</td><td>{{memory}}</td><td>{{disk_read}}</td><td>{{disk_write}}</td><td class="{{status_class}}">{{status}}</td><td>{{alerts}}</td></tr>
{{/each}}
</table>
{{else}}
<p>No virtual machines found.</p>
{{/if}}
<h2>Security</h2>
{{#if security_note}}
<p>{{security_note}}</p>
{{/if}}
{{#if security_alerts}}
<table>
<tr><th>Alert</th><th>Severity</th><th>Status</th><th>Affected resource</th><th>Started</th><th>Description</th></tr>
{{#each security_alerts}}
<tr><td>{{display_name}}</td><td>{{severity}}</td><td>{{status}}</td><td>{{compromised_entity}}</td><td>{{start_time}}</td><td>{{description}}</td></tr>
{{/each}}
</table>
{{/if}}
<h2>Resource inventory ({{resource_count}})</h2>
{{#each resource_types}}
<h3>{{resource_type}} ({{count}})</h3>
<table>
<tr><th>Name</th><th>Resource group</th><th>Location</th><th>Tags</th></tr>
{{#each rows}}
<tr><td>{{name}}</td><td>{{resource_group}}</td><td>{{location}}</td><td>{{tags}}</td></tr>
{{/each}}
{{#if hidden}}
<tr><td colspan="4" class="more">... and {{hidden}} more</td></tr>
{{/if}}
</table>
{{else}}
<p>No resources found.</p>
{{/each}}
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct DashboardView {
    subscription_id: String,
    resource_group: String,
    generated_at: String,
    total_vms: usize,
    running_vms: usize,
    vms_with_alerts: usize,
    active_security_alerts: usize,
    vms: Vec<VmRow>,
    security_note: Option<String>,
    security_alerts: Vec<SecurityRow>,
    resource_count: usize,
    resource_types: Vec<ResourceTypeView>,
}

#[derive(Debug, Serialize)]
struct VmRow {
    name: String,
    location: String,
    vm_size: String,
    os_type: String,
    power_state: String,
    cpu: String,
    memory: String,
    disk_read: String,
    disk_write: String,
    status: &'static str,
    status_class: &'static str,
    alerts: String,
}

#[derive(Debug, Serialize)]
struct SecurityRow {
    display_name: String,
    severity: String,
    status: String,
    compromised_entity: String,
    start_time: String,
    description: String,
}

#[derive(Debug, Serialize)]
struct ResourceTypeView {
    resource_type: String,
    count: usize,
    rows: Vec<ResourceRow>,
    hidden: usize,
}

#[derive(Debug, Serialize)]
struct ResourceRow {
    name: String,
    resource_group: String,
    location: String,
    tags: String,
}

fn scaled(value: Option<f64>, divisor: f64, unit: &str) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |v| format!("{:.2} {unit}", v / divisor),
    )
}

fn vm_row(vm: &VmHealth) -> VmRow {
    let alerts = match &vm.error {
        Some(error) => error.clone(),
        None if vm.alerts.is_empty() => "None".to_string(),
        None => vm.alerts.join("; "),
    };
    VmRow {
        name: vm.name.clone(),
        location: vm.location.clone(),
        vm_size: vm.vm_size.clone(),
        os_type: vm.os_type.clone(),
        power_state: vm.power_state.clone(),
        cpu: vm
            .metrics
            .cpu_percent
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}%")),
        memory: scaled(vm.metrics.memory_available_bytes, BYTES_PER_GB, "GB"),
        disk_read: scaled(vm.metrics.disk_read_bytes, BYTES_PER_MB, "MB"),
        disk_write: scaled(vm.metrics.disk_write_bytes, BYTES_PER_MB, "MB"),
        status: vm.status.as_str(),
        status_class: match vm.status {
            VmStatus::Healthy => "healthy",
            VmStatus::Warning => "warning",
            VmStatus::Error => "error",
        },
        alerts,
    }
}

/// At most [`MAX_TAGS_PER_ROW`] `key: value` pairs, `None` without tags.
fn tag_summary(resource: &ResourceSummary) -> String {
    if resource.tags.is_empty() {
        return "None".to_string();
    }
    let mut shown: Vec<String> = resource
        .tags
        .iter()
        .take(MAX_TAGS_PER_ROW)
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    if resource.tags.len() > MAX_TAGS_PER_ROW {
        shown.push("...".to_string());
    }
    shown.join(", ")
}

fn resource_types(resources: &[ResourceSummary]) -> Vec<ResourceTypeView> {
    group_by_type(resources)
        .into_iter()
        .map(|group| {
            let count = group.resources.len();
            let rows = group
                .resources
                .iter()
                .take(MAX_ROWS_PER_TYPE)
                .map(|r| ResourceRow {
                    name: r.name.clone(),
                    resource_group: r.resource_group.clone(),
                    location: r.location.clone(),
                    tags: tag_summary(r),
                })
                .collect();
            ResourceTypeView {
                resource_type: group.resource_type.to_string(),
                count,
                rows,
                hidden: count.saturating_sub(MAX_ROWS_PER_TYPE),
            }
        })
        .collect()
}

fn view(report: &HealthReport, generated_at: DateTime<Local>) -> DashboardView {
    let alerts = report.security.alerts();
    let security_note = match &report.security {
        SecurityStatus::Alerts(_) => None,
        SecurityStatus::NoActiveAlerts => Some("No active security alerts.".to_string()),
        SecurityStatus::Unavailable(note) => Some(note.clone()),
    };

    DashboardView {
        subscription_id: report.subscription_id.clone(),
        resource_group: report.resource_group.clone(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        total_vms: report
            .vms
            .iter()
            .filter(|vm| vm.status != VmStatus::Error)
            .count(),
        running_vms: report.vms.iter().filter(|vm| vm.is_running()).count(),
        vms_with_alerts: report.vms.iter().filter(|vm| !vm.alerts.is_empty()).count(),
        active_security_alerts: alerts.iter().filter(|a| a.status == "Active").count(),
        vms: report.vms.iter().map(vm_row).collect(),
        security_note,
        security_alerts: alerts
            .iter()
            .map(|a| SecurityRow {
                display_name: a.display_name.clone(),
                severity: a.severity.clone(),
                status: a.status.clone(),
                compromised_entity: a.compromised_entity.clone(),
                start_time: a.start_time.clone(),
                description: a.description.clone(),
            })
            .collect(),
        resource_count: report.resources.len(),
        resource_types: resource_types(&report.resources),
    }
}

/// Renders the dashboard. Every value is HTML-escaped.
///
/// # Errors
///
/// Returns [`MonitorError::Report`] if rendering fails.
pub fn render_dashboard(
    report: &HealthReport,
    generated_at: DateTime<Local>,
) -> Result<String, MonitorError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("dashboard", DASHBOARD_TEMPLATE)?;
    Ok(handlebars.render("dashboard", &view(report, generated_at))?)
}
