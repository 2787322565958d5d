//! Per-record onboarding workflow.
//!
//! ```text
//! Validating -> Creating -> LicenseAssigning -> GroupAssigning -> MailboxConfiguring -> Done
//!                               |
//!                               +-> RollingBack -> Done
//! ```
//!
//! Validation and creation failures end the workflow with no account left
//! behind. A license failure deletes the created account. Group and mailbox
//! failures are recorded as notes and do not affect `success`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::config::OnboardingConfig;
use crate::directory::Directory;
use crate::error::OnboardingError;
use crate::groups::assign_groups;
use crate::license::assign_license;
use crate::mailbox::configure_mailbox;
use crate::provisioner::{provision_account, ProvisionedAccount};
use crate::record::OnboardingRecord;
use crate::result::OnboardingResult;
use crate::sku::SkuMap;
use crate::validator::validate_record;

/// Error recorded when license assignment fails.
pub const LICENSE_FAILURE: &str = "License assignment failed";

/// Workflow states of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    Validating,
    Creating,
    LicenseAssigning,
    RollingBack,
    GroupAssigning,
    MailboxConfiguring,
    Done,
}

impl fmt::Display for OnboardingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Creating => "creating",
            Self::LicenseAssigning => "license_assigning",
            Self::RollingBack => "rolling_back",
            Self::GroupAssigning => "group_assigning",
            Self::MailboxConfiguring => "mailbox_configuring",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs the onboarding workflow for single records.
pub struct Orchestrator {
    directory: Arc<dyn Directory>,
    skus: SkuMap,
    config: OnboardingConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, skus: SkuMap, config: OnboardingConfig) -> Self {
        Self {
            directory,
            skus,
            config,
        }
    }

    /// Resolves the tenant's SKUs and builds an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::SkuResolution`] if the SKUs cannot be read.
    pub async fn connect(
        directory: Arc<dyn Directory>,
        config: OnboardingConfig,
    ) -> Result<Self, OnboardingError> {
        let skus = SkuMap::resolve(directory.as_ref()).await?;
        Ok(Self::new(directory, skus, config))
    }

    #[must_use]
    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    #[must_use]
    pub fn skus(&self) -> &SkuMap {
        &self.skus
    }

    /// Onboards one record. Per-record failures are folded into the result.
    #[instrument(skip(self, record), fields(principal_name = %record.principal_name))]
    pub async fn onboard(&self, record: &OnboardingRecord) -> OnboardingResult {
        let mut result = OnboardingResult::new(record.principal_name.clone());
        let directory = self.directory.as_ref();

        enter(OnboardingState::Validating);
        let report = validate_record(directory, record).await;
        if !report.is_valid() {
            let err = OnboardingError::Validation(report.errors.clone());
            warn!(error = %err, "Record rejected");
            result.errors = report.errors;
            enter(OnboardingState::Done);
            return result;
        }

        enter(OnboardingState::Creating);
        let account = match provision_account(directory, record, &self.config).await {
            Ok(account) => account,
            Err(err) => {
                error!(error = %err, "Account creation failed");
                let reason = match err {
                    OnboardingError::Provision { reason, .. } => reason,
                    other => other.to_string(),
                };
                result.errors.push(format!("User creation failed: {reason}"));
                enter(OnboardingState::Done);
                return result;
            }
        };
        result.account_created = true;

        debug!(delay = ?self.config.settle_delay, "Waiting for directory propagation");
        tokio::time::sleep(self.config.settle_delay).await;

        enter(OnboardingState::LicenseAssigning);
        result.license_assigned = assign_license(
            directory,
            &self.skus,
            &account.account_id,
            &record.license_tier,
            &record.principal_name,
            &self.config.license_retry,
        )
        .await;

        if !result.license_assigned {
            let err = OnboardingError::MandatoryStep {
                step: "License assignment",
                principal_name: record.principal_name.clone(),
                reason: format!("tier {}", record.license_tier),
            };
            error!(error = %err, "Mandatory step failed, rolling back");
            result.errors.push(LICENSE_FAILURE.to_string());

            enter(OnboardingState::RollingBack);
            self.rollback(&account).await;
            enter(OnboardingState::Done);
            return result;
        }

        enter(OnboardingState::GroupAssigning);
        result.groups = assign_groups(directory, &account.account_id, &record.groups).await;
        for name in result.failed_groups(&record.groups) {
            let err = OnboardingError::BestEffortStep {
                step: "Group assignment",
                principal_name: record.principal_name.clone(),
                reason: format!("not added to {name}"),
            };
            warn!(error = %err);
            result.notes.push(format!("Group assignment failed: {name}"));
        }

        enter(OnboardingState::MailboxConfiguring);
        let mailbox = configure_mailbox(
            directory,
            &account.account_id,
            &record.license_tier,
            &record.principal_name,
            record.mailbox_delegate.as_deref(),
            &self.config,
        )
        .await;
        result.mailbox_configured = mailbox.configured;
        if !mailbox.configured {
            let err = OnboardingError::BestEffortStep {
                step: "Mailbox configuration",
                principal_name: record.principal_name.clone(),
                reason: "settings update rejected".to_string(),
            };
            warn!(error = %err);
            result.notes.push("Mailbox configuration failed".to_string());
        }
        result.notes.extend(mailbox.notes);

        result.success = true;
        result.temp_credential = Some(account.temp_credential);
        enter(OnboardingState::Done);
        info!("Onboarding completed");
        result
    }

    /// Deletes an account created earlier in the workflow. Failure is logged only.
    async fn rollback(&self, account: &ProvisionedAccount) {
        match self.directory.delete_user(&account.account_id).await {
            Ok(()) => info!(account_id = %account.account_id, "Rolled back account"),
            Err(source) => {
                let err = OnboardingError::Rollback {
                    principal_name: account.principal_name.clone(),
                    account_id: account.account_id.clone(),
                    source,
                };
                error!(error = %err, "Manual cleanup required");
            }
        }
    }
}

fn enter(state: OnboardingState) {
    debug!(state = %state, "Workflow state");
}
