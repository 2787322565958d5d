//! [`ManagementApi`] over Azure Resource Manager.

use std::sync::Arc;

use async_trait::async_trait;
use cloudops_azure::{AzureConfig, AzureResult, RestClient, TokenCache};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{
    GenericResource, InstanceView, ManagementApi, SecurityAlert, Timespan, VirtualMachine,
};

const RESOURCES_API_VERSION: &str = "2021-04-01";
const COMPUTE_API_VERSION: &str = "2023-03-01";
const METRICS_API_VERSION: &str = "2018-01-01";
const SECURITY_API_VERSION: &str = "2022-01-01";

/// Metric aggregation grain.
pub const METRIC_INTERVAL: &str = "PT5M";

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    #[serde(default)]
    value: Vec<Metric>,
}

#[derive(Debug, Deserialize)]
struct Metric {
    #[serde(default)]
    timeseries: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    data: Vec<MetricValue>,
}

#[derive(Debug, Deserialize)]
struct MetricValue {
    #[serde(default)]
    average: Option<f64>,
}

impl MetricsResponse {
    fn first_average(&self) -> Option<f64> {
        self.value
            .iter()
            .flat_map(|m| &m.timeseries)
            .flat_map(|t| &t.data)
            .find_map(|d| d.average)
    }
}

/// Resource Manager client for one subscription.
#[derive(Debug)]
pub struct ArmClient {
    client: RestClient,
    subscription_id: String,
}

impl ArmClient {
    #[must_use]
    pub fn new(client: RestClient, subscription_id: impl Into<String>) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Builds a Resource Manager client for the configured cloud.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &AzureConfig, subscription_id: &str) -> AzureResult<Self> {
        let tokens = Arc::new(TokenCache::for_resource_manager(config));
        let client = RestClient::new(tokens, config.cloud.resource_manager_endpoint())?;
        Ok(Self::new(client, subscription_id))
    }

    fn subscription_path(&self) -> String {
        format!("/subscriptions/{}", self.subscription_id)
    }
}

#[async_trait]
impl ManagementApi for ArmClient {
    #[instrument(skip(self))]
    async fn list_resources(&self) -> AzureResult<Vec<GenericResource>> {
        let path = format!(
            "{}/resources?api-version={RESOURCES_API_VERSION}",
            self.subscription_path()
        );
        self.client.get_all(&path).await
    }

    #[instrument(skip(self))]
    async fn list_virtual_machines(
        &self,
        resource_group: &str,
    ) -> AzureResult<Vec<VirtualMachine>> {
        let path = format!(
            "{}/resourceGroups/{resource_group}/providers/Microsoft.Compute/virtualMachines?api-version={COMPUTE_API_VERSION}",
            self.subscription_path()
        );
        self.client.get_all(&path).await
    }

    #[instrument(skip(self))]
    async fn vm_instance_view(
        &self,
        resource_group: &str,
        vm_name: &str,
    ) -> AzureResult<InstanceView> {
        let path = format!(
            "{}/resourceGroups/{resource_group}/providers/Microsoft.Compute/virtualMachines/{vm_name}/instanceView?api-version={COMPUTE_API_VERSION}",
            self.subscription_path()
        );
        self.client.get(&path).await
    }

    #[instrument(skip(self, timespan))]
    async fn metric_average(
        &self,
        resource_id: &str,
        metric: &str,
        timespan: &Timespan,
    ) -> AzureResult<Option<f64>> {
        let path = format!(
            "{resource_id}/providers/Microsoft.Insights/metrics?api-version={METRICS_API_VERSION}&metricnames={}&timespan={}&interval={METRIC_INTERVAL}&aggregation=Average",
            urlencoding::encode(metric),
            urlencoding::encode(&timespan.to_iso()),
        );
        let response: MetricsResponse = self.client.get(&path).await?;
        Ok(response.first_average())
    }

    #[instrument(skip(self))]
    async fn list_security_alerts(&self) -> AzureResult<Vec<SecurityAlert>> {
        let path = format!(
            "{}/providers/Microsoft.Security/alerts?api-version={SECURITY_API_VERSION}",
            self.subscription_path()
        );
        self.client.get_all(&path).await
    }
}
