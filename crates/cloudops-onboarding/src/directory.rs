//! The directory service seam.
//!
//! Every remote effect of the pipeline goes through [`Directory`]. The
//! production implementation is [`GraphDirectory`](crate::GraphDirectory);
//! tests substitute an in-memory fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudops_azure::AzureResult;
use serde::{Deserialize, Serialize};

/// A license SKU the tenant subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedSku {
    pub sku_id: String,
    pub sku_part_number: String,
    #[serde(default)]
    pub consumed_units: i64,
    #[serde(default)]
    pub prepaid_units: PrepaidUnits,
}

/// Purchased seats of a SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrepaidUnits {
    #[serde(default)]
    pub enabled: i64,
}

impl SubscribedSku {
    /// Seats still available for assignment.
    #[must_use]
    pub fn available_units(&self) -> i64 {
        self.prepaid_units.enabled - self.consumed_units
    }
}

/// A directory user as returned by lookups and creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub user_principal_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Profile of a tenant user for the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUser {
    #[serde(default)]
    pub display_name: Option<String>,
    pub user_principal_name: String,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub account_enabled: Option<bool>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub office_location: Option<String>,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
}

impl TenantUser {
    /// Properties requested from the directory, in `$select` form.
    pub const SELECT: &'static str = "displayName,userPrincipalName,mail,accountEnabled,\
        userType,jobTitle,department,officeLocation,createdDateTime";
}

/// A directory group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub id: String,
    pub display_name: String,
}

/// Request body for account creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub account_enabled: bool,
    pub display_name: String,
    pub user_principal_name: String,
    /// Local part of the principal name.
    pub mail_nickname: String,
    pub password_profile: PasswordProfile,
    pub given_name: String,
    pub surname: String,
    /// Two-letter country code; licensing is refused without it.
    pub usage_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

/// Initial password settings.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub password: String,
    pub force_change_password_next_sign_in: bool,
}

impl std::fmt::Debug for PasswordProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordProfile")
            .field("password", &"[REDACTED]")
            .field(
                "force_change_password_next_sign_in",
                &self.force_change_password_next_sign_in,
            )
            .finish()
    }
}

/// Partial update of a user. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailbox_settings: Option<MailboxSettings>,
}

impl UserPatch {
    /// True if the patch carries profile fields (anything but mailbox settings).
    #[must_use]
    pub fn has_profile_fields(&self) -> bool {
        self.display_name.is_some()
            || self.department.is_some()
            || self.job_title.is_some()
            || self.usage_location.is_some()
    }
}

/// Mailbox settings subset managed by onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LocaleInfo>,
}

/// Locale of a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleInfo {
    pub locale: String,
}

/// Outcome of a group membership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The user was added.
    Added,
    /// The user was already a member; nothing changed.
    AlreadyMember,
}

/// Remote operations the onboarding pipeline performs against the directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Lists the license SKUs the tenant subscribes to.
    async fn list_subscribed_skus(&self) -> AzureResult<Vec<SubscribedSku>>;

    /// Looks up a user by exact principal name.
    async fn find_user_by_principal_name(
        &self,
        principal_name: &str,
    ) -> AzureResult<Option<DirectoryUser>>;

    /// Creates a user account.
    async fn create_user(&self, user: &NewUser) -> AzureResult<DirectoryUser>;

    /// Adds one license to a user.
    async fn assign_license(&self, user_id: &str, sku_id: &str) -> AzureResult<()>;

    /// Finds groups whose display name equals `display_name`.
    async fn find_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> AzureResult<Vec<DirectoryGroup>>;

    /// Adds a user to a group.
    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> AzureResult<MembershipOutcome>;

    /// Applies a partial update to a user.
    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> AzureResult<()>;

    /// Deletes a user.
    async fn delete_user(&self, user_id: &str) -> AzureResult<()>;

    /// Lists every user in the tenant, following pagination.
    async fn list_users(&self) -> AzureResult<Vec<TenantUser>>;
}
