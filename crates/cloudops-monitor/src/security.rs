//! Active security alerts.

use tracing::{info, instrument, warn};

use crate::api::{ManagementApi, SecurityAlert};

const ACTIVE_STATES: [&str; 2] = ["Active", "InProgress"];

/// An alert that still needs attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAlert {
    pub name: String,
    pub display_name: String,
    pub severity: String,
    pub status: String,
    pub description: String,
    pub compromised_entity: String,
    pub start_time: String,
}

impl From<SecurityAlert> for ActiveAlert {
    fn from(alert: SecurityAlert) -> Self {
        let p = alert.properties;
        Self {
            display_name: p.alert_display_name.unwrap_or_else(|| alert.name.clone()),
            name: alert.name,
            severity: p.severity.unwrap_or_else(|| "Unknown".into()),
            status: p.status.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            compromised_entity: p.compromised_entity.unwrap_or_default(),
            start_time: p.start_time_utc.unwrap_or_default(),
        }
    }
}

/// Security section of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityStatus {
    Alerts(Vec<ActiveAlert>),
    NoActiveAlerts,
    /// The alert feed could not be read.
    Unavailable(String),
}

impl SecurityStatus {
    #[must_use]
    pub fn alerts(&self) -> &[ActiveAlert] {
        match self {
            Self::Alerts(alerts) => alerts,
            _ => &[],
        }
    }
}

fn is_active(alert: &SecurityAlert) -> bool {
    alert
        .properties
        .status
        .as_deref()
        .is_some_and(|s| ACTIVE_STATES.contains(&s))
}

/// Reads the subscription's alerts, keeping those still `Active` or `InProgress`.
#[instrument(skip(api))]
pub async fn collect_security_status(api: &dyn ManagementApi) -> SecurityStatus {
    let alerts = match api.list_security_alerts().await {
        Ok(alerts) => alerts,
        Err(e) => {
            warn!(error = %e, "Security alerts unavailable");
            return SecurityStatus::Unavailable(format!(
                "Security alerts could not be retrieved: {e}"
            ));
        }
    };

    let active: Vec<ActiveAlert> = alerts
        .into_iter()
        .filter(is_active)
        .map(ActiveAlert::from)
        .collect();

    if active.is_empty() {
        info!("No active security alerts");
        SecurityStatus::NoActiveAlerts
    } else {
        info!(count = active.len(), "Active security alerts");
        SecurityStatus::Alerts(active)
    }
}
