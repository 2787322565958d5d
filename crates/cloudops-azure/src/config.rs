//! Cloud environments and client credentials.

use secrecy::SecretString;

/// Azure national cloud the tenant lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloudEnvironment {
    /// Azure public cloud.
    #[default]
    Commercial,
    /// Azure US Government (GCC High).
    UsGovernment,
    /// Azure China (operated by 21Vianet).
    China,
    /// Azure Germany.
    Germany,
}

impl CloudEnvironment {
    /// Parses the `AZURE_CLOUD` value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "commercial" | "public" => Ok(Self::Commercial),
            "us_government" | "usgovernment" | "gcc_high" => Ok(Self::UsGovernment),
            "china" => Ok(Self::China),
            "germany" => Ok(Self::Germany),
            other => Err(ConfigError::InvalidValue(
                "AZURE_CLOUD".into(),
                format!("unknown cloud '{other}'"),
            )),
        }
    }

    /// Login (token issuer) endpoint.
    #[must_use]
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Germany => "https://login.microsoftonline.de",
        }
    }

    /// Microsoft Graph endpoint (without API version).
    #[must_use]
    pub fn graph_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
        }
    }

    /// Azure Resource Manager endpoint.
    #[must_use]
    pub fn resource_manager_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://management.azure.com",
            Self::UsGovernment => "https://management.usgovcloudapi.net",
            Self::China => "https://management.chinacloudapi.cn",
            Self::Germany => "https://management.microsoftazure.de",
        }
    }

    /// Graph v1.0 base URL.
    #[must_use]
    pub fn graph_base_url(&self) -> String {
        format!("{}/v1.0", self.graph_endpoint())
    }
}

/// Service principal credentials (app registration).
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Connection settings shared by both tools.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub credentials: ClientCredentials,
    pub cloud: CloudEnvironment,
}

impl AzureConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// Lets tests supply variables without touching the process environment.
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

        let tenant_id = required("AZURE_TENANT_ID")?;
        let client_id = required("AZURE_CLIENT_ID")?;
        let client_secret = SecretString::new(required("AZURE_CLIENT_SECRET")?);

        let cloud = match reader("AZURE_CLOUD") {
            Ok(value) => CloudEnvironment::parse(&value)?,
            Err(_) => CloudEnvironment::default(),
        };

        Ok(Self {
            credentials: ClientCredentials {
                tenant_id,
                client_id,
                client_secret,
            },
            cloud,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::env::VarError;

    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn full_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("AZURE_TENANT_ID", "tenant-1"),
            ("AZURE_CLIENT_ID", "client-1"),
            ("AZURE_CLIENT_SECRET", "s3cret"),
        ])
    }

    #[test]
    fn test_defaults_to_commercial_cloud() {
        let config = AzureConfig::from_reader(make_reader(full_vars())).unwrap();
        assert_eq!(config.cloud, CloudEnvironment::Commercial);
        assert_eq!(config.credentials.tenant_id, "tenant-1");
        assert_eq!(config.credentials.client_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn test_missing_secret() {
        let mut vars = full_vars();
        vars.remove("AZURE_CLIENT_SECRET");
        let err = AzureConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
        assert!(err.to_string().contains("AZURE_CLIENT_SECRET"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = full_vars();
        vars.insert("AZURE_TENANT_ID", "  ");
        let err = AzureConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(err.to_string().contains("AZURE_TENANT_ID"));
    }

    #[test]
    fn test_cloud_selection() {
        let mut vars = full_vars();
        vars.insert("AZURE_CLOUD", "us_government");
        let config = AzureConfig::from_reader(make_reader(vars)).unwrap();
        assert_eq!(config.cloud, CloudEnvironment::UsGovernment);
        assert_eq!(config.cloud.graph_base_url(), "https://graph.microsoft.us/v1.0");
    }

    #[test]
    fn test_unknown_cloud_rejected() {
        let mut vars = full_vars();
        vars.insert("AZURE_CLOUD", "mars");
        let err = AzureConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_, _)));
    }
}
