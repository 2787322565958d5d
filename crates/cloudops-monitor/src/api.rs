//! The management API seam and the resource shapes it returns.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use cloudops_azure::AzureResult;
use serde::Deserialize;

/// A resource from the subscription-wide resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenericResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
}

/// A virtual machine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: VmProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmProperties {
    #[serde(default)]
    pub hardware_profile: Option<HardwareProfile>,
    #[serde(default)]
    pub storage_profile: Option<StorageProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    pub vm_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    pub os_disk: Option<OsDisk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    pub os_type: Option<String>,
}

impl VirtualMachine {
    #[must_use]
    pub fn vm_size(&self) -> Option<&str> {
        self.properties
            .hardware_profile
            .as_ref()
            .and_then(|h| h.vm_size.as_deref())
    }

    #[must_use]
    pub fn os_type(&self) -> Option<&str> {
        self.properties
            .storage_profile
            .as_ref()
            .and_then(|s| s.os_disk.as_ref())
            .and_then(|d| d.os_type.as_deref())
    }
}

/// Runtime view of a VM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstanceView {
    #[serde(default)]
    pub statuses: Vec<InstanceStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    pub code: String,
    #[serde(default)]
    pub display_status: Option<String>,
}

/// A Defender for Cloud security alert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityAlert {
    pub name: String,
    #[serde(default)]
    pub properties: SecurityAlertProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlertProperties {
    #[serde(default)]
    pub alert_display_name: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    /// `Active`, `InProgress`, `Resolved` or `Dismissed`.
    #[serde(default, alias = "state")]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub compromised_entity: Option<String>,
    #[serde(default, alias = "startTime")]
    pub start_time_utc: Option<String>,
}

/// Closed time interval for metric queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timespan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Timespan {
    /// The hour ending at `end`.
    #[must_use]
    pub fn last_hour(end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::hours(1),
            end,
        }
    }

    /// ISO 8601 interval, `start/end`.
    #[must_use]
    pub fn to_iso(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Read-only management operations used by the monitor.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Lists every resource in the subscription.
    async fn list_resources(&self) -> AzureResult<Vec<GenericResource>>;

    /// Lists the VMs of a resource group.
    async fn list_virtual_machines(
        &self,
        resource_group: &str,
    ) -> AzureResult<Vec<VirtualMachine>>;

    /// Fetches the runtime status of a VM.
    async fn vm_instance_view(
        &self,
        resource_group: &str,
        vm_name: &str,
    ) -> AzureResult<InstanceView>;

    /// First non-empty average of `metric` over `timespan` at five-minute grain.
    async fn metric_average(
        &self,
        resource_id: &str,
        metric: &str,
        timespan: &Timespan,
    ) -> AzureResult<Option<f64>>;

    /// Lists the subscription's security alerts.
    async fn list_security_alerts(&self) -> AzureResult<Vec<SecurityAlert>>;
}
