//! License assignment with bounded retries.

use cloudops_azure::AzureError;
use tracing::{error, info, instrument, warn};

use crate::config::RetryPolicy;
use crate::directory::Directory;
use crate::sku::{SkuLookup, SkuMap};

/// Assigns the license for `tier` to an account.
///
/// The no-license tier succeeds without a remote call. An unresolvable tier
/// fails without a remote call. Otherwise assignment is attempted up to
/// `policy.max_attempts` times, sleeping between attempts only. Only service
/// responses are retried. Any other error has already been through the
/// client's own retries and ends the loop at once.
#[instrument(skip(directory, skus, policy))]
pub async fn assign_license(
    directory: &dyn Directory,
    skus: &SkuMap,
    account_id: &str,
    tier: &str,
    principal_name: &str,
    policy: &RetryPolicy,
) -> bool {
    let sku_id = match skus.lookup(tier) {
        SkuLookup::NoLicense => {
            info!("No license requested");
            return true;
        }
        SkuLookup::NotFound => {
            error!(tier = %tier, "No SKU available for license tier");
            return false;
        }
        SkuLookup::Resolved(id) => id,
    };

    for attempt in 1..=policy.max_attempts {
        match directory.assign_license(account_id, &sku_id).await {
            Ok(()) => {
                info!(tier = %tier, attempt, "License assigned");
                return true;
            }
            Err(e @ AzureError::Api { .. }) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "License assignment attempt failed"
                );
                if let Some(delay) = policy.delay_after(attempt) {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(e) => {
                warn!(attempt, error = %e, "License assignment cannot be retried");
                break;
            }
        }
    }

    error!(tier = %tier, "License assignment failed");
    false
}
