//! Post-creation mailbox settings.

use tracing::{info, instrument, warn};

use crate::config::OnboardingConfig;
use crate::directory::{Directory, LocaleInfo, MailboxSettings, UserPatch};
use crate::sku::LicenseTier;

/// Outcome of configuring a mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxOutcome {
    /// Whether the settings update succeeded.
    pub configured: bool,
    /// Follow-up steps an administrator has to perform by hand.
    pub notes: Vec<String>,
}

/// The settings patch applied to every new mailbox.
#[must_use]
pub fn mailbox_patch(config: &OnboardingConfig) -> UserPatch {
    UserPatch {
        mailbox_settings: Some(MailboxSettings {
            time_zone: Some(config.mailbox_time_zone.clone()),
            language: Some(LocaleInfo {
                locale: config.mailbox_locale.clone(),
            }),
        }),
        ..Default::default()
    }
}

/// Applies the mailbox time zone and locale with one update call.
///
/// E5 accounts and requested delegates only produce notes; neither is
/// applied here.
#[instrument(skip(directory, config, delegate))]
pub async fn configure_mailbox(
    directory: &dyn Directory,
    account_id: &str,
    tier: &str,
    principal_name: &str,
    delegate: Option<&str>,
    config: &OnboardingConfig,
) -> MailboxOutcome {
    let mut notes = Vec::new();

    let configured = match directory
        .update_user(account_id, &mailbox_patch(config))
        .await
    {
        Ok(()) => {
            info!("Mailbox settings applied");
            true
        }
        Err(e) => {
            warn!(error = %e, "Mailbox settings not applied");
            false
        }
    };

    if LicenseTier::parse(tier) == Some(LicenseTier::E5) {
        notes.push(format!(
            "Litigation Hold for {principal_name} must be enabled in Exchange Online"
        ));
    }
    if let Some(delegate) = delegate {
        notes.push(format!(
            "Mailbox delegation of {principal_name} to {delegate} must be granted in Exchange Online"
        ));
    }
    for note in &notes {
        info!(note = %note, "Manual follow-up required");
    }

    MailboxOutcome { configured, notes }
}
