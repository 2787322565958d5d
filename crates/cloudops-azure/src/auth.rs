//! `OAuth2` client credentials authentication.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{AzureConfig, AzureError, AzureResult, ClientCredentials};

/// Token response from the Microsoft identity platform.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Token cache for one audience (Graph or Resource Manager).
#[derive(Debug)]
pub struct TokenCache {
    credentials: ClientCredentials,
    login_endpoint: String,
    scope: String,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    /// Refresh this long before expiry (default: 5 minutes).
    grace_period: Duration,
}

impl TokenCache {
    /// Creates a token cache for an arbitrary login endpoint and scope.
    pub fn new(
        credentials: ClientCredentials,
        login_endpoint: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            login_endpoint: login_endpoint.into(),
            scope: scope.into(),
            http_client: reqwest::Client::new(),
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Token cache scoped to Microsoft Graph.
    #[must_use]
    pub fn for_graph(config: &AzureConfig) -> Self {
        Self::new(
            config.credentials.clone(),
            config.cloud.login_endpoint(),
            format!("{}/.default", config.cloud.graph_endpoint()),
        )
    }

    /// Token cache scoped to Azure Resource Manager.
    #[must_use]
    pub fn for_resource_manager(config: &AzureConfig) -> Self {
        Self::new(
            config.credentials.clone(),
            config.cloud.login_endpoint(),
            format!("{}/.default", config.cloud.resource_manager_endpoint()),
        )
    }

    /// Gets a valid access token, refreshing if necessary.
    #[instrument(skip(self), fields(tenant_id = %self.credentials.tenant_id, scope = %self.scope))]
    pub async fn get_token(&self) -> AzureResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Refreshing access token");
        let new_token = self.acquire_token().await?;
        let access_token = new_token.access_token.clone();
        *self.cached_token.write().await = Some(new_token);

        Ok(access_token)
    }

    /// Acquires a new access token using the client credentials flow.
    async fn acquire_token(&self) -> AzureResult<CachedToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_endpoint, self.credentials.tenant_id
        );

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            (
                "client_secret",
                self.credentials.client_secret.expose_secret().as_str(),
            ),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AzureError::Auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AzureError::Auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AzureError::Auth(format!("Failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(%expires_at, "Acquired new token");

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Drops the cached token, forcing a refresh on next use.
    pub async fn invalidate(&self) {
        *self.cached_token.write().await = None;
    }
}
