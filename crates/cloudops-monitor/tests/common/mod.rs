//! Common test utilities for cloudops-monitor integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cloudops_azure::{
    AzureError, AzureResult, ClientCredentials, RestClient, ThrottlePolicy, TokenCache,
};
use cloudops_monitor::{
    ArmClient, GenericResource, HardwareProfile, InstanceStatus, InstanceView, ManagementApi,
    MonitorConfig, OsDisk, SecurityAlert, SecurityAlertProperties, StorageProfile, Timespan,
    VirtualMachine, VmProperties,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";
pub const SUBSCRIPTION_ID: &str = "sub-1";
pub const RESOURCE_GROUP: &str = "rg-prod";

pub fn vm_id(name: &str) -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION_ID}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Compute/virtualMachines/{name}"
    )
}

pub fn monitor_config() -> MonitorConfig {
    MonitorConfig {
        subscription_id: SUBSCRIPTION_ID.to_string(),
        resource_group: RESOURCE_GROUP.to_string(),
        cpu_threshold: 80.0,
    }
}

fn remote_error(status: u16, message: &str) -> AzureError {
    AzureError::Api {
        status,
        code: "InternalServerError".to_string(),
        message: message.to_string(),
    }
}

#[derive(Default)]
struct State {
    resources: Vec<GenericResource>,
    vms: Vec<VirtualMachine>,
    power_states: HashMap<String, String>,
    metrics: HashMap<(String, String), f64>,
    alerts: Vec<SecurityAlert>,
    fail_resources: bool,
    fail_vm_list: bool,
    fail_instance_view: HashSet<String>,
    fail_metrics: bool,
    fail_alerts: bool,
    metric_windows: Vec<Timespan>,
}

/// In-memory management API.
#[derive(Default)]
pub struct FakeManagementApi {
    state: Mutex<State>,
}

impl FakeManagementApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(self, name: &str, resource_type: &str, tags: &[(&str, &str)]) -> Self {
        self.state.lock().unwrap().resources.push(GenericResource {
            id: format!(
                "/subscriptions/{SUBSCRIPTION_ID}/resourceGroups/{RESOURCE_GROUP}/providers/{resource_type}/{name}"
            ),
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            location: "westeurope".to_string(),
            tags: if tags.is_empty() {
                None
            } else {
                Some(
                    tags.iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<BTreeMap<_, _>>(),
                )
            },
        });
        self
    }

    pub fn with_vm(self, name: &str, power_state: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.vms.push(VirtualMachine {
                id: vm_id(name),
                name: name.to_string(),
                location: "westeurope".to_string(),
                properties: VmProperties {
                    hardware_profile: Some(HardwareProfile {
                        vm_size: Some("Standard_B2s".to_string()),
                    }),
                    storage_profile: Some(StorageProfile {
                        os_disk: Some(OsDisk {
                            os_type: Some("Linux".to_string()),
                        }),
                    }),
                },
            });
            state
                .power_states
                .insert(name.to_string(), power_state.to_string());
        }
        self
    }

    pub fn with_metric(self, vm: &str, metric: &str, value: f64) -> Self {
        self.state
            .lock()
            .unwrap()
            .metrics
            .insert((vm_id(vm), metric.to_string()), value);
        self
    }

    pub fn with_alert(self, name: &str, status: &str, severity: &str) -> Self {
        self.state.lock().unwrap().alerts.push(SecurityAlert {
            name: name.to_string(),
            properties: SecurityAlertProperties {
                alert_display_name: Some(format!("{name} detected")),
                severity: Some(severity.to_string()),
                status: Some(status.to_string()),
                ..Default::default()
            },
        });
        self
    }

    pub fn failing_resources(self) -> Self {
        self.state.lock().unwrap().fail_resources = true;
        self
    }

    pub fn failing_vm_list(self) -> Self {
        self.state.lock().unwrap().fail_vm_list = true;
        self
    }

    pub fn failing_instance_view(self, vm: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_instance_view
            .insert(vm.to_string());
        self
    }

    pub fn failing_metrics(self) -> Self {
        self.state.lock().unwrap().fail_metrics = true;
        self
    }

    pub fn failing_alerts(self) -> Self {
        self.state.lock().unwrap().fail_alerts = true;
        self
    }

    pub fn metric_windows(&self) -> Vec<Timespan> {
        self.state.lock().unwrap().metric_windows.clone()
    }
}

#[async_trait]
impl ManagementApi for FakeManagementApi {
    async fn list_resources(&self) -> AzureResult<Vec<GenericResource>> {
        let state = self.state.lock().unwrap();
        if state.fail_resources {
            return Err(remote_error(500, "resource listing failed"));
        }
        Ok(state.resources.clone())
    }

    async fn list_virtual_machines(
        &self,
        resource_group: &str,
    ) -> AzureResult<Vec<VirtualMachine>> {
        let state = self.state.lock().unwrap();
        if state.fail_vm_list {
            return Err(remote_error(500, "vm listing failed"));
        }
        assert_eq!(resource_group, RESOURCE_GROUP);
        Ok(state.vms.clone())
    }

    async fn vm_instance_view(
        &self,
        _resource_group: &str,
        vm_name: &str,
    ) -> AzureResult<InstanceView> {
        let state = self.state.lock().unwrap();
        if state.fail_instance_view.contains(vm_name) {
            return Err(remote_error(404, "instance view not found"));
        }
        let statuses = state
            .power_states
            .get(vm_name)
            .map(|p| {
                vec![
                    InstanceStatus {
                        code: "ProvisioningState/succeeded".to_string(),
                        display_status: None,
                    },
                    InstanceStatus {
                        code: format!("PowerState/{p}"),
                        display_status: None,
                    },
                ]
            })
            .unwrap_or_default();
        Ok(InstanceView { statuses })
    }

    async fn metric_average(
        &self,
        resource_id: &str,
        metric: &str,
        timespan: &Timespan,
    ) -> AzureResult<Option<f64>> {
        let mut state = self.state.lock().unwrap();
        state.metric_windows.push(*timespan);
        if state.fail_metrics {
            return Err(remote_error(503, "metrics unavailable"));
        }
        Ok(state
            .metrics
            .get(&(resource_id.to_string(), metric.to_string()))
            .copied())
    }

    async fn list_security_alerts(&self) -> AzureResult<Vec<SecurityAlert>> {
        let state = self.state.lock().unwrap();
        if state.fail_alerts {
            return Err(AzureError::Api {
                status: 403,
                code: "AuthorizationFailed".to_string(),
                message: "Defender for Cloud is not enabled".to_string(),
            });
        }
        Ok(state.alerts.clone())
    }
}

pub fn fake_api(api: FakeManagementApi) -> Arc<dyn ManagementApi> {
    Arc::new(api)
}

/// Creates a token response JSON.
pub fn create_token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Creates an ARM error response.
pub fn create_arm_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Mock Resource Manager server wrapper.
pub struct MockArmServer {
    pub server: MockServer,
}

impl MockArmServer {
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
                    .set_body_json(create_token_response("mock-arm-token", 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Builds an ARM client whose login endpoint and API base point at the mock.
    pub fn client(&self) -> ArmClient {
        let credentials = ClientCredentials {
            tenant_id: TENANT_ID.to_string(),
            client_id: "test-client".to_string(),
            client_secret: secrecy::SecretString::new("test-secret".to_string()),
        };
        let tokens = Arc::new(TokenCache::new(
            credentials,
            self.url(),
            "https://management.azure.com/.default",
        ));
        let client = RestClient::with_policy(tokens, self.url(), ThrottlePolicy::for_testing())
            .unwrap();
        ArmClient::new(client, SUBSCRIPTION_ID)
    }
}
