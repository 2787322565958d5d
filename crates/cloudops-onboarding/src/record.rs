//! Input records.
//!
//! The input file is a CSV with a header row. Recognized columns:
//! `first_name`, `last_name`, `user_principal_name`, `license_type`,
//! `department`, `job_title`, `manager_email`, `groups` (semicolon
//! separated) and `mailbox_delegation`. Missing columns read as empty.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::OnboardingError;

/// One new hire to onboard. Immutable once read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingRecord {
    pub first_name: String,
    pub last_name: String,
    pub principal_name: String,
    pub license_tier: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub manager_email: Option<String>,
    /// Group display names, in input order.
    pub groups: Vec<String>,
    pub mailbox_delegate: Option<String>,
}

impl OnboardingRecord {
    /// `"<first> <last>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Local part of the principal name, used as the mail nickname.
    #[must_use]
    pub fn mail_nickname(&self) -> &str {
        self.principal_name
            .split_once('@')
            .map_or(self.principal_name.as_str(), |(local, _)| local)
    }
}

/// Raw CSV row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvOnboardingRow {
    first_name: String,
    last_name: String,
    user_principal_name: String,
    license_type: String,
    department: String,
    job_title: String,
    manager_email: String,
    groups: String,
    mailbox_delegation: String,
}

impl From<CsvOnboardingRow> for OnboardingRecord {
    fn from(row: CsvOnboardingRow) -> Self {
        Self {
            first_name: row.first_name,
            last_name: row.last_name,
            principal_name: row.user_principal_name,
            license_tier: row.license_type,
            department: non_empty(row.department),
            job_title: non_empty(row.job_title),
            manager_email: non_empty(row.manager_email),
            groups: split_groups(&row.groups),
            mailbox_delegate: non_empty(row.mailbox_delegation),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Splits a `;`-separated group list, trimming names and dropping empty ones.
#[must_use]
pub fn split_groups(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads every record from a CSV file.
///
/// # Errors
///
/// Returns [`OnboardingError::InputNotFound`] if the file does not exist and
/// [`OnboardingError::Csv`] if it cannot be parsed.
pub fn read_records(path: &Path) -> Result<Vec<OnboardingRecord>, OnboardingError> {
    if !path.exists() {
        return Err(OnboardingError::InputNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    parse_records(file)
}

/// Parses records from any CSV source.
///
/// # Errors
///
/// Returns [`OnboardingError::Csv`] if a row cannot be parsed.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<OnboardingRecord>, OnboardingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize::<CsvOnboardingRow>() {
        records.push(OnboardingRecord::from(row?));
    }
    Ok(records)
}
