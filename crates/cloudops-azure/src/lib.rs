//! Shared Azure plumbing for the cloudops tools.
//!
//! Both the onboarding pipeline (Microsoft Graph) and the health monitor
//! (Azure Resource Manager) talk to Azure with the same ingredients:
//!
//! - `OAuth2` client credentials authentication with a cached token
//! - Cloud-specific endpoints (Commercial, US Government, China, Germany)
//! - A JSON REST client that handles throttling (429), transient gateway
//!   errors (502/503/504) and paginated collections
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloudops_azure::{AzureConfig, RestClient, TokenCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AzureConfig::from_env()?;
//! let tokens = Arc::new(TokenCache::for_graph(&config));
//! let graph = RestClient::new(tokens, config.cloud.graph_base_url())?;
//!
//! let me: serde_json::Value = graph.get("/organization").await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod throttle;

pub use auth::TokenCache;
pub use client::{Page, RestClient};
pub use config::{AzureConfig, ClientCredentials, CloudEnvironment, ConfigError};
pub use error::{AzureError, AzureResult};
pub use throttle::ThrottlePolicy;
