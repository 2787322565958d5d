//! Monitor settings.

use cloudops_azure::ConfigError;

/// Default CPU alert threshold in percent.
pub const DEFAULT_CPU_THRESHOLD: f64 = 80.0;

/// What to monitor and when to alert.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub subscription_id: String,
    /// Resource group whose VMs are inspected.
    pub resource_group: String,
    /// Average CPU percentage above which a VM is flagged.
    pub cpu_threshold: f64,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let required = |key: &str| {
            reader(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.into()))
        };

        let subscription_id = required("AZURE_SUBSCRIPTION_ID")?;
        let resource_group = required("AZURE_RESOURCE_GROUP")?;

        let cpu_threshold = match reader("MONITOR_CPU_THRESHOLD") {
            Ok(value) => {
                let parsed = value.trim().parse::<f64>().map_err(|_| {
                    ConfigError::InvalidValue("MONITOR_CPU_THRESHOLD".into(), value.clone())
                })?;
                if !(0.0..=100.0).contains(&parsed) {
                    return Err(ConfigError::InvalidValue(
                        "MONITOR_CPU_THRESHOLD".into(),
                        value,
                    ));
                }
                parsed
            }
            Err(_) => DEFAULT_CPU_THRESHOLD,
        };

        Ok(Self {
            subscription_id,
            resource_group,
            cpu_threshold,
        })
    }
}
