//! End-to-end monitoring passes against the in-memory management API.

mod common;

use chrono::{Duration, TimeZone, Utc};
use cloudops_monitor::{
    collect_inventory, collect_security_status, collect_vm_health, Monitor, SecurityStatus,
    VmStatus, CPU_METRIC, MEMORY_METRIC,
};
use common::{fake_api, monitor_config, FakeManagementApi};
use tempfile::TempDir;

#[tokio::test]
async fn test_vm_over_threshold_is_warning() {
    let api = FakeManagementApi::new()
        .with_vm("web-1", "running")
        .with_vm("db-1", "running")
        .with_metric("web-1", CPU_METRIC, 35.0)
        .with_metric("db-1", CPU_METRIC, 92.5)
        .with_metric("db-1", MEMORY_METRIC, 1_073_741_824.0);

    let rows = collect_vm_health(&api, &monitor_config(), Utc::now()).await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "web-1");
    assert_eq!(rows[0].status, VmStatus::Healthy);
    assert!(rows[0].alerts.is_empty());

    assert_eq!(rows[1].status, VmStatus::Warning);
    assert_eq!(
        rows[1].alerts,
        vec!["CPU usage (92.5%) exceeds threshold (80%)".to_string()]
    );
    assert_eq!(rows[1].metrics.memory_available_bytes, Some(1_073_741_824.0));
    assert_eq!(rows[1].metrics.disk_read_bytes, None);
    assert_eq!(rows[1].vm_size, "Standard_B2s");
    assert_eq!(rows[1].os_type, "Linux");
    assert_eq!(rows[1].power_state, "running");
}

#[tokio::test]
async fn test_metrics_use_last_hour() {
    let api = FakeManagementApi::new().with_vm("web-1", "running");
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    collect_vm_health(&api, &monitor_config(), now).await;

    let windows = api.metric_windows();
    assert_eq!(windows.len(), 4);
    for window in windows {
        assert_eq!(window.end, now);
        assert_eq!(window.start, now - Duration::hours(1));
    }
}

#[tokio::test]
async fn test_unavailable_metrics_keep_vm_healthy() {
    let api = FakeManagementApi::new()
        .with_vm("web-1", "deallocated")
        .failing_metrics();

    let rows = collect_vm_health(&api, &monitor_config(), Utc::now()).await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, VmStatus::Healthy);
    assert_eq!(rows[0].metrics.cpu_percent, None);
    assert_eq!(rows[0].power_state, "deallocated");
}

#[tokio::test]
async fn test_instance_view_failure_yields_error_row() {
    let api = FakeManagementApi::new()
        .with_vm("web-1", "running")
        .with_vm("broken-1", "running")
        .failing_instance_view("broken-1");

    let rows = collect_vm_health(&api, &monitor_config(), Utc::now()).await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, VmStatus::Healthy);
    assert_eq!(rows[1].name, "broken-1");
    assert_eq!(rows[1].status, VmStatus::Error);
    assert_eq!(rows[1].power_state, "Unknown");
    assert!(rows[1].error.as_deref().unwrap().contains("instance view not found"));
}

#[tokio::test]
async fn test_vm_list_failure_yields_no_rows() {
    let api = FakeManagementApi::new()
        .with_vm("web-1", "running")
        .failing_vm_list();

    let rows = collect_vm_health(&api, &monitor_config(), Utc::now()).await;

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_inventory_and_failure() {
    let api = FakeManagementApi::new()
        .with_resource("st1", "Microsoft.Storage/storageAccounts", &[("env", "prod")])
        .with_resource("vnet", "Microsoft.Network/virtualNetworks", &[]);

    let resources = collect_inventory(&api).await;
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].resource_group, "rg-prod");
    assert_eq!(resources[0].tags.get("env").map(String::as_str), Some("prod"));
    assert!(resources[1].tags.is_empty());

    let failing = FakeManagementApi::new()
        .with_resource("st1", "Microsoft.Storage/storageAccounts", &[])
        .failing_resources();
    assert!(collect_inventory(&failing).await.is_empty());
}

#[tokio::test]
async fn test_security_keeps_active_alerts_only() {
    let api = FakeManagementApi::new()
        .with_alert("brute-force", "Active", "High")
        .with_alert("malware", "InProgress", "Medium")
        .with_alert("old-scan", "Resolved", "Low")
        .with_alert("noise", "Dismissed", "Low");

    let status = collect_security_status(&api).await;

    let names: Vec<_> = status.alerts().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["brute-force", "malware"]);
    assert_eq!(status.alerts()[0].display_name, "brute-force detected");
}

#[tokio::test]
async fn test_security_no_active_alerts() {
    let api = FakeManagementApi::new().with_alert("old-scan", "Resolved", "Low");
    assert_eq!(
        collect_security_status(&api).await,
        SecurityStatus::NoActiveAlerts
    );
}

#[tokio::test]
async fn test_security_unavailable_is_not_fatal() {
    let api = FakeManagementApi::new().failing_alerts();

    match collect_security_status(&api).await {
        SecurityStatus::Unavailable(note) => {
            assert!(note.contains("Defender for Cloud is not enabled"));
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_full_pass_writes_dashboard() {
    let api = FakeManagementApi::new()
        .with_resource("web-1", "Microsoft.Compute/virtualMachines", &[])
        .with_resource("st1", "Microsoft.Storage/storageAccounts", &[("env", "prod")])
        .with_vm("web-1", "running")
        .with_metric("web-1", CPU_METRIC, 97.0)
        .failing_alerts();
    let monitor = Monitor::new(fake_api(api), monitor_config());

    let report = monitor.collect(Utc::now()).await;
    assert_eq!(report.subscription_id, "sub-1");
    assert_eq!(report.resources.len(), 2);
    assert_eq!(report.vms.len(), 1);
    assert!(matches!(report.security, SecurityStatus::Unavailable(_)));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("azure_health_report.html");
    report.write_dashboard(&path).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Azure Health Dashboard"));
    assert!(html.contains("CPU usage (97.0%) exceeds threshold (80%)"));
    assert!(html.contains("Security alerts could not be retrieved"));
    assert!(html.contains("env: prod"));
}

#[tokio::test]
async fn test_every_source_failing_still_renders() {
    let api = FakeManagementApi::new()
        .failing_resources()
        .failing_vm_list()
        .failing_alerts();
    let monitor = Monitor::new(fake_api(api), monitor_config());

    let report = monitor.collect(Utc::now()).await;
    assert!(report.vms.is_empty());
    assert!(report.resources.is_empty());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.html");
    report.write_dashboard(&path).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("No virtual machines found."));
    assert!(html.contains("No resources found."));
}
