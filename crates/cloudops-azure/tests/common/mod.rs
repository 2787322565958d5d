//! Common test utilities for cloudops-azure integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use cloudops_azure::{ClientCredentials, RestClient, ThrottlePolicy, TokenCache};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";

/// Creates a mock OAuth token response.
pub fn create_token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Creates an error envelope response.
pub fn create_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Test credentials.
pub fn credentials() -> ClientCredentials {
    ClientCredentials {
        tenant_id: TENANT_ID.to_string(),
        client_id: "test-client".to_string(),
        client_secret: secrecy::SecretString::new("test-secret".to_string()),
    }
}

/// Mock server wrapper with common setup helpers.
pub struct MockAzureServer {
    pub server: MockServer,
}

impl MockAzureServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Sets up the OAuth token endpoint.
    pub async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_token_response("mock-access-token", 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Builds a client whose login endpoint and API base both point at the mock.
    pub fn client(&self) -> RestClient {
        let tokens = Arc::new(TokenCache::new(
            credentials(),
            self.url(),
            "https://graph.microsoft.com/.default",
        ));
        RestClient::with_policy(
            tokens,
            format!("{}/v1.0", self.url()),
            ThrottlePolicy::for_testing(),
        )
        .unwrap()
    }
}
