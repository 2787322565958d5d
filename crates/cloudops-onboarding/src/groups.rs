//! Group membership assignment.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::directory::{Directory, MembershipOutcome};

/// Adds an account to each named group.
///
/// Every name is handled independently and appears in the returned map
/// exactly once. Being a member already counts as success.
#[instrument(skip(directory, group_names))]
pub async fn assign_groups(
    directory: &dyn Directory,
    account_id: &str,
    group_names: &[String],
) -> HashMap<String, bool> {
    let mut results = HashMap::with_capacity(group_names.len());

    for name in group_names {
        if results.contains_key(name) {
            continue;
        }
        let added = add_to_group(directory, account_id, name).await;
        results.insert(name.clone(), added);
    }

    results
}

async fn add_to_group(directory: &dyn Directory, account_id: &str, name: &str) -> bool {
    let group = match directory.find_groups_by_display_name(name).await {
        Ok(groups) => match groups.into_iter().next() {
            Some(group) => group,
            None => {
                warn!(group = %name, "Group not found");
                return false;
            }
        },
        Err(e) => {
            warn!(group = %name, error = %e, "Group lookup failed");
            return false;
        }
    };

    match directory.add_group_member(&group.id, account_id).await {
        Ok(MembershipOutcome::Added) => {
            info!(group = %name, "Added to group");
            true
        }
        Ok(MembershipOutcome::AlreadyMember) => {
            info!(group = %name, "Already a member");
            true
        }
        Err(e) => {
            warn!(group = %name, error = %e, "Failed to add group member");
            false
        }
    }
}
