//! JSON REST client with token injection, retry handling and pagination.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::{Origin, Url};

use crate::{AzureError, AzureResult, ThrottlePolicy, TokenCache};

/// Error envelope shared by Microsoft Graph (`OData`) and Resource Manager.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// One page of a collection response.
///
/// Graph links the next page through `@odata.nextLink`, Resource Manager
/// through `nextLink`.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", alias = "nextLink", default)]
    pub next_link: Option<String>,
}

/// REST client bound to one API base URL.
#[derive(Debug)]
pub struct RestClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    base_url: String,
    origin: Origin,
    policy: ThrottlePolicy,
}

impl RestClient {
    /// Creates a client with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token_cache: Arc<TokenCache>, base_url: impl Into<String>) -> AzureResult<Self> {
        Self::with_policy(token_cache, base_url, ThrottlePolicy::default())
    }

    /// Creates a client with a custom retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL, the HTTP
    /// client cannot be created or the policy is invalid.
    pub fn with_policy(
        token_cache: Arc<TokenCache>,
        base_url: impl Into<String>,
        policy: ThrottlePolicy,
    ) -> AzureResult<Self> {
        policy
            .validate()
            .map_err(|e| AzureError::Config(format!("Invalid retry policy: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AzureError::Config(format!(
                "Unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AzureError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache,
            origin: parsed.origin(),
            base_url,
            policy,
        })
    }

    /// Base URL every relative path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a path against the base URL.
    ///
    /// Absolute URLs (next links) are accepted only on the base URL's origin,
    /// so the bearer token never leaves the API host.
    ///
    /// # Errors
    ///
    /// Returns [`AzureError::ForeignHost`] for an absolute URL on another origin.
    pub fn url(&self, path: &str) -> AzureResult<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            let link = Url::parse(path)?;
            if link.origin() != self.origin {
                return Err(AzureError::ForeignHost(
                    link.host_str().unwrap_or_default().to_string(),
                ));
            }
            Ok(path.to_string())
        } else if path.starts_with('/') {
            Ok(format!("{}{}", self.base_url, path))
        } else {
            Ok(format!("{}/{}", self.base_url, path))
        }
    }

    /// GET a single JSON document.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AzureResult<T> {
        let response = self.send(reqwest::Method::GET, path, None).await?;
        response.json().await.map_err(AzureError::from)
    }

    /// GET every page of a collection and concatenate the items.
    #[instrument(skip(self))]
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> AzureResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(path.to_string());

        while let Some(url) = next {
            debug!(url = %url, "Fetching page");
            let page: Page<T> = self.get(&url).await?;
            items.extend(page.value);
            next = page.next_link;
        }

        Ok(items)
    }

    /// POST a JSON body and parse the JSON response.
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> AzureResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(reqwest::Method::POST, path, Some(&body)).await?;
        response.json().await.map_err(AzureError::from)
    }

    /// POST a JSON body, ignoring any response body.
    #[instrument(skip(self, body))]
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> AzureResult<()> {
        let body = serde_json::to_value(body)?;
        self.send(reqwest::Method::POST, path, Some(&body)).await?;
        Ok(())
    }

    /// PATCH a JSON body. Graph answers `204 No Content`.
    #[instrument(skip(self, body))]
    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> AzureResult<()> {
        let body = serde_json::to_value(body)?;
        self.send(reqwest::Method::PATCH, path, Some(&body)).await?;
        Ok(())
    }

    /// DELETE a resource.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> AzureResult<()> {
        self.send(reqwest::Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Sends a request, retrying on 401 (once, with a fresh token), 429 and 502/503/504.
    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> AzureResult<reqwest::Response> {
        let url = self.url(path)?;
        let mut transient_retries = 0u32;
        let mut throttle_retries = 0u32;
        let mut token_refreshed = false;

        loop {
            let token = self.token_cache.get_token().await?;

            let mut request = self
                .http_client
                .request(method.clone(), &url)
                .bearer_auth(&token);
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == reqwest::StatusCode::UNAUTHORIZED && !token_refreshed {
                debug!("Token rejected, refreshing");
                self.token_cache.invalidate().await;
                token_refreshed = true;
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if throttle_retries >= self.policy.max_throttle_retries {
                    return Err(AzureError::Throttled {
                        attempts: throttle_retries,
                    });
                }
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(ThrottlePolicy::parse_retry_after);
                let delay = self.policy.throttle_delay(retry_after, throttle_retries);
                throttle_retries += 1;
                warn!(
                    "Throttled, retry {}/{} after {:?}",
                    throttle_retries, self.policy.max_throttle_retries, delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if matches!(
                status,
                reqwest::StatusCode::BAD_GATEWAY
                    | reqwest::StatusCode::SERVICE_UNAVAILABLE
                    | reqwest::StatusCode::GATEWAY_TIMEOUT
            ) && transient_retries < self.policy.max_transient_retries
            {
                let delay = self.policy.backoff_delay(transient_retries);
                transient_retries += 1;
                warn!(
                    "Transient error {}, retry {}/{} after {:?}",
                    status, transient_retries, self.policy.max_transient_retries, delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let error_body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_body));
        }
    }
}

/// Builds an `AzureError::Api` from a failed response body.
fn api_error(status: reqwest::StatusCode, body: &str) -> AzureError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => AzureError::Api {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => AzureError::Api {
            status: status.as_u16(),
            code: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: body.to_string(),
        },
    }
}
