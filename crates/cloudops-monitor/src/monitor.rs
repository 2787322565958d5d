//! One monitoring pass over a subscription.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use cloudops_azure::AzureConfig;
use tracing::{info, instrument};

use crate::api::ManagementApi;
use crate::arm::ArmClient;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::inventory::{collect_inventory, ResourceSummary};
use crate::report::render_dashboard;
use crate::security::{collect_security_status, SecurityStatus};
use crate::vm::{collect_vm_health, VmHealth};

/// Everything collected in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub subscription_id: String,
    pub resource_group: String,
    pub vms: Vec<VmHealth>,
    pub security: SecurityStatus,
    pub resources: Vec<ResourceSummary>,
}

impl HealthReport {
    /// Writes the rendered dashboard to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_dashboard(&self, path: &Path) -> Result<(), MonitorError> {
        let html = render_dashboard(self, Local::now())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, html)?;
        info!(path = %path.display(), "Dashboard written");
        Ok(())
    }
}

/// Collects inventory, VM health and security alerts.
pub struct Monitor {
    api: Arc<dyn ManagementApi>,
    config: MonitorConfig,
}

impl Monitor {
    #[must_use]
    pub fn new(api: Arc<dyn ManagementApi>, config: MonitorConfig) -> Self {
        Self { api, config }
    }

    /// Monitor backed by Azure Resource Manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(azure: &AzureConfig, config: MonitorConfig) -> Result<Self, MonitorError> {
        let api = ArmClient::from_config(azure, &config.subscription_id)?;
        Ok(Self::new(Arc::new(api), config))
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Runs every collector. Sources that fail degrade to empty or unavailable sections.
    #[instrument(skip(self), fields(subscription_id = %self.config.subscription_id))]
    pub async fn collect(&self, now: DateTime<Utc>) -> HealthReport {
        info!("Starting health check");
        let api = self.api.as_ref();

        let resources = collect_inventory(api).await;
        let vms = collect_vm_health(api, &self.config, now).await;
        let security = collect_security_status(api).await;

        info!(
            resources = resources.len(),
            vms = vms.len(),
            security_alerts = security.alerts().len(),
            "Health check complete"
        );

        HealthReport {
            subscription_id: self.config.subscription_id.clone(),
            resource_group: self.config.resource_group.clone(),
            vms,
            security,
            resources,
        }
    }
}
