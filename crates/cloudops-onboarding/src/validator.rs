//! Record validation.
//!
//! Every check runs; problems accumulate so the caller sees all of a
//! record's defects at once. A failing directory lookup skips only the
//! check it backs.

use tracing::{instrument, warn};

use crate::directory::Directory;
use crate::record::OnboardingRecord;
use crate::sku::LicenseTier;

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a record against the directory.
#[instrument(skip(directory, record), fields(principal_name = %record.principal_name))]
pub async fn validate_record(
    directory: &dyn Directory,
    record: &OnboardingRecord,
) -> ValidationReport {
    let mut errors = Vec::new();

    for (field, value) in [
        ("first_name", &record.first_name),
        ("last_name", &record.last_name),
        ("user_principal_name", &record.principal_name),
        ("license_type", &record.license_tier),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    let principal_name = record.principal_name.trim();
    if !principal_name.is_empty() {
        if !principal_name.contains('@') {
            errors.push(format!("Invalid UPN format: {principal_name}"));
        }

        match directory.find_user_by_principal_name(principal_name).await {
            Ok(Some(_)) => errors.push(format!("User already exists: {principal_name}")),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Duplicate check skipped"),
        }
    }

    if let Some(manager) = record.manager_email.as_deref() {
        match directory.find_user_by_principal_name(manager).await {
            Ok(Some(_)) => {}
            Ok(None) => errors.push(format!("Manager not found: {manager}")),
            Err(e) => warn!(manager = %manager, error = %e, "Manager check skipped"),
        }
    }

    let tier = record.license_tier.trim();
    if !tier.is_empty() && LicenseTier::parse(tier).is_none() {
        errors.push(format!(
            "Invalid license type: {tier}. Must be one of: {}",
            LicenseTier::names()
        ));
    }

    ValidationReport { errors }
}
