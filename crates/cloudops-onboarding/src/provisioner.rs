//! Account creation.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::config::OnboardingConfig;
use crate::credential::generate_credential;
use crate::directory::{Directory, NewUser, PasswordProfile};
use crate::error::OnboardingError;
use crate::record::OnboardingRecord;

/// A newly created directory account.
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    pub account_id: String,
    pub principal_name: String,
    pub display_name: String,
    pub temp_credential: SecretString,
}

/// Builds the creation request for a record with the given initial credential.
#[must_use]
pub fn new_user_request(
    record: &OnboardingRecord,
    credential: &SecretString,
    config: &OnboardingConfig,
) -> NewUser {
    NewUser {
        account_enabled: true,
        display_name: record.display_name(),
        user_principal_name: record.principal_name.clone(),
        mail_nickname: record.mail_nickname().to_string(),
        password_profile: PasswordProfile {
            password: credential.expose_secret().clone(),
            force_change_password_next_sign_in: true,
        },
        given_name: record.first_name.clone(),
        surname: record.last_name.clone(),
        usage_location: config.usage_location.clone(),
        department: record.department.clone(),
        job_title: record.job_title.clone(),
    }
}

/// Creates the directory account for a validated record.
///
/// # Errors
///
/// Returns [`OnboardingError::Provision`] if the directory rejects the request.
#[instrument(skip(directory, record, config), fields(principal_name = %record.principal_name))]
pub async fn provision_account(
    directory: &dyn Directory,
    record: &OnboardingRecord,
    config: &OnboardingConfig,
) -> Result<ProvisionedAccount, OnboardingError> {
    let credential = generate_credential();
    let request = new_user_request(record, &credential, config);

    let user = directory
        .create_user(&request)
        .await
        .map_err(|e| OnboardingError::Provision {
            principal_name: record.principal_name.clone(),
            reason: e.to_string(),
        })?;

    info!(account_id = %user.id, "Created account");

    Ok(ProvisionedAccount {
        account_id: user.id,
        principal_name: record.principal_name.clone(),
        display_name: request.display_name,
        temp_credential: credential,
    })
}
