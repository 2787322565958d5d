//! [`Directory`] over Microsoft Graph v1.0.

use std::sync::Arc;

use async_trait::async_trait;
use cloudops_azure::{AzureConfig, AzureError, AzureResult, Page, RestClient, TokenCache};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::directory::{
    Directory, DirectoryGroup, DirectoryUser, MembershipOutcome, NewUser, SubscribedSku,
    TenantUser, UserPatch,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignLicenseRequest {
    add_licenses: Vec<AddedLicense>,
    remove_licenses: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddedLicense {
    sku_id: String,
}

/// Directory backed by Microsoft Graph.
#[derive(Debug)]
pub struct GraphDirectory {
    client: RestClient,
}

impl GraphDirectory {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Builds a Graph client for the configured cloud.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &AzureConfig) -> AzureResult<Self> {
        let tokens = Arc::new(TokenCache::for_graph(config));
        let client = RestClient::new(tokens, config.cloud.graph_base_url())?;
        Ok(Self::new(client))
    }
}

/// Quotes a value as an `OData` string literal.
fn odata_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds a URL-encoded `$filter` equality query string.
fn eq_filter(property: &str, value: &str) -> String {
    let filter = format!("{property} eq {}", odata_literal(value));
    format!("$filter={}", urlencoding::encode(&filter))
}

/// Returns true if a membership request failed because the reference exists.
///
/// Graph reports this as `400 Request_BadRequest` with "One or more added
/// object references already exist".
fn is_already_member(err: &AzureError) -> bool {
    match err {
        AzureError::Api {
            status: 400,
            message,
            ..
        } => message.to_ascii_lowercase().contains("already exist"),
        _ => false,
    }
}

#[async_trait]
impl Directory for GraphDirectory {
    #[instrument(skip(self))]
    async fn list_subscribed_skus(&self) -> AzureResult<Vec<SubscribedSku>> {
        self.client.get_all("/subscribedSkus").await
    }

    #[instrument(skip(self))]
    async fn find_user_by_principal_name(
        &self,
        principal_name: &str,
    ) -> AzureResult<Option<DirectoryUser>> {
        let path = format!(
            "/users?{}&$select=id,userPrincipalName,displayName",
            eq_filter("userPrincipalName", principal_name)
        );
        let page: Page<DirectoryUser> = self.client.get(&path).await?;
        Ok(page.value.into_iter().next())
    }

    #[instrument(skip(self, user), fields(principal_name = %user.user_principal_name))]
    async fn create_user(&self, user: &NewUser) -> AzureResult<DirectoryUser> {
        let created: DirectoryUser = self.client.post("/users", user).await?;
        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn assign_license(&self, user_id: &str, sku_id: &str) -> AzureResult<()> {
        let body = AssignLicenseRequest {
            add_licenses: vec![AddedLicense {
                sku_id: sku_id.to_string(),
            }],
            remove_licenses: Vec::new(),
        };
        self.client
            .post_no_content(&format!("/users/{user_id}/assignLicense"), &body)
            .await
    }

    #[instrument(skip(self))]
    async fn find_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> AzureResult<Vec<DirectoryGroup>> {
        let path = format!(
            "/groups?{}&$select=id,displayName",
            eq_filter("displayName", display_name)
        );
        let page: Page<DirectoryGroup> = self.client.get(&path).await?;
        Ok(page.value)
    }

    #[instrument(skip(self))]
    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> AzureResult<MembershipOutcome> {
        let body = serde_json::json!({
            "@odata.id": format!("{}/directoryObjects/{}", self.client.base_url(), user_id)
        });
        match self
            .client
            .post_no_content(&format!("/groups/{group_id}/members/$ref"), &body)
            .await
        {
            Ok(()) => Ok(MembershipOutcome::Added),
            Err(e) if is_already_member(&e) => {
                debug!("Membership already present");
                Ok(MembershipOutcome::AlreadyMember)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, patch))]
    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> AzureResult<()> {
        if patch.has_profile_fields() {
            let profile = UserPatch {
                mailbox_settings: None,
                ..patch.clone()
            };
            self.client
                .patch(&format!("/users/{user_id}"), &profile)
                .await?;
        }
        if let Some(settings) = &patch.mailbox_settings {
            self.client
                .patch(&format!("/users/{user_id}/mailboxSettings"), settings)
                .await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> AzureResult<()> {
        self.client.delete(&format!("/users/{user_id}")).await?;
        info!("User deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> AzureResult<Vec<TenantUser>> {
        let users: Vec<TenantUser> = self
            .client
            .get_all(&format!("/users?$select={}", TenantUser::SELECT))
            .await?;
        debug!(count = users.len(), "Users listed");
        Ok(users)
    }
}
