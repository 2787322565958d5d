//! Common test utilities for cloudops-onboarding integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cloudops_azure::{
    AzureError, AzureResult, ClientCredentials, RestClient, ThrottlePolicy, TokenCache,
};
use cloudops_onboarding::{
    Directory, DirectoryGroup, DirectoryUser, GraphDirectory, MembershipOutcome, NewUser,
    OnboardingConfig, OnboardingRecord, Orchestrator, PrepaidUnits, SkuMap, SubscribedSku,
    TenantUser, UserPatch,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A remote call observed by [`FakeDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSkus,
    FindUser(String),
    CreateUser(String),
    AssignLicense { user_id: String, sku_id: String },
    FindGroups(String),
    AddMember { group_id: String, user_id: String },
    UpdateUser(String),
    DeleteUser(String),
    ListUsers,
}

#[derive(Default)]
struct State {
    skus: Vec<SubscribedSku>,
    users: HashMap<String, DirectoryUser>,
    groups: Vec<DirectoryGroup>,
    members: HashSet<(String, String)>,
    license_failures: u32,
    license_unreachable: bool,
    fail_skus: bool,
    fail_lookup: bool,
    fail_create: bool,
    fail_mailbox: bool,
    fail_delete: bool,
    next_id: u32,
    calls: Vec<Call>,
}

/// In-memory directory that records every call.
#[derive(Default)]
pub struct FakeDirectory {
    state: Mutex<State>,
}

fn remote_error(message: &str) -> AzureError {
    AzureError::Api {
        status: 500,
        code: "InternalServerError".to_string(),
        message: message.to_string(),
    }
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sku(self, sku_id: &str, part_number: &str) -> Self {
        self.state.lock().unwrap().skus.push(SubscribedSku {
            sku_id: sku_id.to_string(),
            sku_part_number: part_number.to_string(),
            consumed_units: 0,
            prepaid_units: PrepaidUnits { enabled: 25 },
        });
        self
    }

    pub fn with_user(self, principal_name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = format!("existing-{}", state.next_id);
            state.users.insert(
                principal_name.to_string(),
                DirectoryUser {
                    id,
                    user_principal_name: principal_name.to_string(),
                    display_name: None,
                },
            );
        }
        self
    }

    pub fn with_group(self, group_id: &str, display_name: &str) -> Self {
        self.state.lock().unwrap().groups.push(DirectoryGroup {
            id: group_id.to_string(),
            display_name: display_name.to_string(),
        });
        self
    }

    /// Makes the first `n` license assignments fail.
    pub fn failing_license(self, n: u32) -> Self {
        self.state.lock().unwrap().license_failures = n;
        self
    }

    /// Makes every license assignment fail as if still throttled after the
    /// client's own retries.
    pub fn throttled_license(self) -> Self {
        self.state.lock().unwrap().license_unreachable = true;
        self
    }

    pub fn failing_skus(self) -> Self {
        self.state.lock().unwrap().fail_skus = true;
        self
    }

    pub fn failing_lookup(self) -> Self {
        self.state.lock().unwrap().fail_lookup = true;
        self
    }

    pub fn failing_create(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn failing_mailbox(self) -> Self {
        self.state.lock().unwrap().fail_mailbox = true;
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().unwrap().fail_delete = true;
        self
    }

    /// Records an existing membership.
    pub fn add_existing_membership(&self, group_id: &str, user_id: &str) {
        self.state
            .lock()
            .unwrap()
            .members
            .insert((group_id.to_string(), user_id.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn user_exists(&self, principal_name: &str) -> bool {
        self.state.lock().unwrap().users.contains_key(principal_name)
    }

    pub fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .members
            .contains(&(group_id.to_string(), user_id.to_string()))
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn list_subscribed_skus(&self) -> AzureResult<Vec<SubscribedSku>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListSkus);
        if state.fail_skus {
            return Err(AzureError::Auth("insufficient privileges".to_string()));
        }
        Ok(state.skus.clone())
    }

    async fn find_user_by_principal_name(
        &self,
        principal_name: &str,
    ) -> AzureResult<Option<DirectoryUser>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FindUser(principal_name.to_string()));
        if state.fail_lookup {
            return Err(remote_error("lookup unavailable"));
        }
        Ok(state.users.get(principal_name).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> AzureResult<DirectoryUser> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::CreateUser(user.user_principal_name.clone()));
        if state.fail_create {
            return Err(AzureError::Api {
                status: 400,
                code: "Request_BadRequest".to_string(),
                message: "Password does not meet complexity requirements".to_string(),
            });
        }
        state.next_id += 1;
        let created = DirectoryUser {
            id: format!("user-{}", state.next_id),
            user_principal_name: user.user_principal_name.clone(),
            display_name: Some(user.display_name.clone()),
        };
        state
            .users
            .insert(user.user_principal_name.clone(), created.clone());
        Ok(created)
    }

    async fn assign_license(&self, user_id: &str, sku_id: &str) -> AzureResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AssignLicense {
            user_id: user_id.to_string(),
            sku_id: sku_id.to_string(),
        });
        if state.license_unreachable {
            return Err(AzureError::Throttled { attempts: 5 });
        }
        if state.license_failures > 0 {
            state.license_failures -= 1;
            return Err(remote_error("License assignment failed on the service"));
        }
        Ok(())
    }

    async fn find_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> AzureResult<Vec<DirectoryGroup>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FindGroups(display_name.to_string()));
        Ok(state
            .groups
            .iter()
            .filter(|g| g.display_name == display_name)
            .cloned()
            .collect())
    }

    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> AzureResult<MembershipOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AddMember {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
        });
        if state
            .members
            .insert((group_id.to_string(), user_id.to_string()))
        {
            Ok(MembershipOutcome::Added)
        } else {
            Ok(MembershipOutcome::AlreadyMember)
        }
    }

    async fn update_user(&self, user_id: &str, _patch: &UserPatch) -> AzureResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateUser(user_id.to_string()));
        if state.fail_mailbox {
            return Err(remote_error("MailboxNotEnabledForRESTAPI"));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> AzureResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteUser(user_id.to_string()));
        if state.fail_delete {
            return Err(remote_error("delete rejected"));
        }
        state.users.retain(|_, u| u.id != user_id);
        Ok(())
    }

    async fn list_users(&self) -> AzureResult<Vec<TenantUser>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListUsers);
        let mut users: Vec<TenantUser> = state
            .users
            .values()
            .map(|u| TenantUser {
                display_name: u.display_name.clone(),
                user_principal_name: u.user_principal_name.clone(),
                mail: None,
                account_enabled: Some(true),
                user_type: Some("Member".to_string()),
                job_title: None,
                department: None,
                office_location: None,
                created_date_time: None,
            })
            .collect();
        users.sort_by(|a, b| a.user_principal_name.cmp(&b.user_principal_name));
        Ok(users)
    }
}

/// Builds a record with the fields every test needs.
pub fn record(principal_name: &str, license: &str, groups: &[&str]) -> OnboardingRecord {
    OnboardingRecord {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        principal_name: principal_name.to_string(),
        license_tier: license.to_string(),
        groups: groups.iter().map(|g| (*g).to_string()).collect(),
        ..Default::default()
    }
}

/// Builds an orchestrator over the fake with millisecond delays.
pub async fn orchestrator(directory: Arc<FakeDirectory>) -> Orchestrator {
    let skus = SkuMap::resolve(directory.as_ref()).await.unwrap();
    Orchestrator::new(directory, skus, OnboardingConfig::for_testing())
}

// ---------------------------------------------------------------------------
// Graph mock server
// ---------------------------------------------------------------------------

pub const TENANT_ID: &str = "test-tenant";

/// Creates a mock OAuth token response.
pub fn create_token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Mock Graph server wrapper with common setup helpers.
pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn new() -> Self {
        let server = Self {
            server: MockServer::start().await,
        };
        server.mock_token_endpoint().await;
        server
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_token_response("mock-access-token", 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Builds a Graph directory whose login endpoint and API base point at the mock.
    pub fn directory(&self) -> GraphDirectory {
        let credentials = ClientCredentials {
            tenant_id: TENANT_ID.to_string(),
            client_id: "test-client".to_string(),
            client_secret: secrecy::SecretString::new("test-secret".to_string()),
        };
        let tokens = Arc::new(TokenCache::new(
            credentials,
            self.url(),
            "https://graph.microsoft.com/.default",
        ));
        let client = RestClient::with_policy(
            tokens,
            format!("{}/v1.0", self.url()),
            ThrottlePolicy::for_testing(),
        )
        .unwrap();
        GraphDirectory::new(client)
    }
}
