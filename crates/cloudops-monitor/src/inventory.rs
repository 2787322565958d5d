//! Subscription resource inventory.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, error, info, instrument, warn};

use crate::api::{GenericResource, ManagementApi};

/// One inventoried resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub name: String,
    pub resource_type: String,
    pub location: String,
    pub resource_group: String,
    pub id: String,
    pub tags: BTreeMap<String, String>,
}

impl From<GenericResource> for ResourceSummary {
    fn from(resource: GenericResource) -> Self {
        Self {
            resource_group: resource_group_of(&resource.id),
            name: resource.name,
            resource_type: resource.resource_type,
            location: resource.location,
            id: resource.id,
            tags: resource.tags.unwrap_or_default(),
        }
    }
}

/// Resource group named in a resource id, `Unknown` if there is none.
///
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/...`
#[must_use]
pub fn resource_group_of(resource_id: &str) -> String {
    resource_id
        .split('/')
        .nth(4)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// Resources of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeGroup<'a> {
    pub resource_type: &'a str,
    pub resources: Vec<&'a ResourceSummary>,
}

/// Groups resources by type, largest group first, ties by type name.
#[must_use]
pub fn group_by_type(resources: &[ResourceSummary]) -> Vec<ResourceTypeGroup<'_>> {
    let mut by_type: HashMap<&str, Vec<&ResourceSummary>> = HashMap::new();
    for resource in resources {
        by_type
            .entry(resource.resource_type.as_str())
            .or_default()
            .push(resource);
    }

    let mut groups: Vec<ResourceTypeGroup<'_>> = by_type
        .into_iter()
        .map(|(resource_type, resources)| ResourceTypeGroup {
            resource_type,
            resources,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.resources
            .len()
            .cmp(&a.resources.len())
            .then_with(|| a.resource_type.cmp(b.resource_type))
    });
    groups
}

/// Lists every resource in the subscription. A failed listing yields an empty inventory.
#[instrument(skip(api))]
pub async fn collect_inventory(api: &dyn ManagementApi) -> Vec<ResourceSummary> {
    let resources: Vec<ResourceSummary> = match api.list_resources().await {
        Ok(resources) => resources.into_iter().map(ResourceSummary::from).collect(),
        Err(e) => {
            error!(error = %e, "Failed to enumerate resources");
            return Vec::new();
        }
    };

    if resources.is_empty() {
        warn!("No resources found in subscription");
        return resources;
    }

    info!(count = resources.len(), "Resources found");
    for resource in &resources {
        debug!(
            name = %resource.name,
            resource_type = %resource.resource_type,
            resource_group = %resource.resource_group,
            "Resource"
        );
    }
    for group in group_by_type(&resources) {
        info!(
            resource_type = %group.resource_type,
            count = group.resources.len(),
            "Resources by type"
        );
    }

    resources
}
