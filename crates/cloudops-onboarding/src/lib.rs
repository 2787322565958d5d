//! Bulk user onboarding for Microsoft Entra ID.
//!
//! Reads new-hire records from CSV and, for each record in turn:
//!
//! 1. validates it against the directory,
//! 2. creates the account with a temporary credential,
//! 3. assigns the license (retried, rolled back on failure),
//! 4. adds group memberships (best effort),
//! 5. applies mailbox settings (best effort).
//!
//! Outcomes are written as a credentials CSV, a failures CSV and an HTML
//! report.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use cloudops_azure::AzureConfig;
//! use cloudops_onboarding::{
//!     read_records, run_batch, write_outputs, GraphDirectory, OnboardingConfig, Orchestrator,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let azure = AzureConfig::from_env()?;
//! let directory = Arc::new(GraphDirectory::from_config(&azure)?);
//! let orchestrator = Orchestrator::connect(directory, OnboardingConfig::default()).await?;
//!
//! let records = read_records(Path::new("input/users_to_onboard.csv"))?;
//! let summary = run_batch(&orchestrator, records).await;
//! write_outputs(Path::new("output"), &summary)?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod config;
mod credential;
mod directory;
mod error;
mod graph;
mod groups;
mod license;
mod mailbox;
mod orchestrator;
mod output;
mod provisioner;
mod record;
mod report;
mod result;
mod sku;
mod validator;

pub use batch::run_batch;
pub use config::{OnboardingConfig, RetryPolicy};
pub use credential::{generate_credential, meets_complexity, CREDENTIAL_LENGTH, SYMBOLS};
pub use directory::{
    Directory, DirectoryGroup, DirectoryUser, LocaleInfo, MailboxSettings, MembershipOutcome,
    NewUser, PasswordProfile, PrepaidUnits, SubscribedSku, TenantUser, UserPatch,
};
pub use error::OnboardingError;
pub use graph::GraphDirectory;
pub use groups::assign_groups;
pub use license::assign_license;
pub use mailbox::{configure_mailbox, mailbox_patch, MailboxOutcome};
pub use orchestrator::{OnboardingState, Orchestrator, LICENSE_FAILURE};
pub use output::{
    write_credentials, write_failures, write_outputs, OutputPaths, CREDENTIALS_FILE,
    FAILURES_FILE, REPORT_FILE,
};
pub use provisioner::{new_user_request, provision_account, ProvisionedAccount};
pub use record::{parse_records, read_records, split_groups, OnboardingRecord};
pub use report::{console_summary, render_report};
pub use result::{BatchSummary, OnboardingResult, ProcessedRecord, MINUTES_SAVED_PER_USER};
pub use sku::{LicenseTier, SkuLookup, SkuMap};
pub use validator::{validate_record, ValidationReport};
