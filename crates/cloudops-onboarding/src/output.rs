//! Output files of an onboarding run.
//!
//! - `secure_credentials.csv`: one row per created account, written only if
//!   at least one record succeeded. Contains temporary credentials.
//! - `failed_onboardings.csv`: one row per failed record, written only if
//!   at least one record failed.
//! - `onboarding_report.html`: always written.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::OnboardingError;
use crate::report::render_report;
use crate::result::{BatchSummary, ProcessedRecord};

pub const CREDENTIALS_FILE: &str = "secure_credentials.csv";
pub const FAILURES_FILE: &str = "failed_onboardings.csv";
pub const REPORT_FILE: &str = "onboarding_report.html";

/// Row of the credentials file.
#[derive(Debug, Serialize)]
struct CredentialRow<'a> {
    upn: &'a str,
    display_name: String,
    temp_password: &'a str,
    department: &'a str,
    job_title: &'a str,
}

/// Row of the failures file.
#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    upn: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    department: &'a str,
    job_title: &'a str,
    license_type: &'a str,
    error_reasons: String,
}

/// Writes the credentials CSV for successful records.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_credentials<W: Write>(
    successes: &[ProcessedRecord],
    writer: W,
) -> Result<(), OnboardingError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for processed in successes {
        let Some(credential) = processed.result.temp_credential.as_ref() else {
            warn!(
                principal_name = %processed.record.principal_name,
                "Successful record without credential"
            );
            continue;
        };
        let record = &processed.record;
        wtr.serialize(CredentialRow {
            upn: &record.principal_name,
            display_name: record.display_name(),
            temp_password: credential.expose_secret(),
            department: record.department.as_deref().unwrap_or_default(),
            job_title: record.job_title.as_deref().unwrap_or_default(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the failures CSV.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_failures<W: Write>(
    failures: &[ProcessedRecord],
    writer: W,
) -> Result<(), OnboardingError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for processed in failures {
        let record = &processed.record;
        wtr.serialize(FailureRow {
            upn: &record.principal_name,
            first_name: &record.first_name,
            last_name: &record.last_name,
            department: record.department.as_deref().unwrap_or_default(),
            job_title: record.job_title.as_deref().unwrap_or_default(),
            license_type: &record.license_tier,
            error_reasons: processed.result.errors.join("; "),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub credentials: Option<PathBuf>,
    pub failures: Option<PathBuf>,
    pub report: PathBuf,
}

/// Writes every output file of a run into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn write_outputs(dir: &Path, summary: &BatchSummary) -> Result<OutputPaths, OnboardingError> {
    std::fs::create_dir_all(dir)?;

    let credentials = if summary.successes.is_empty() {
        None
    } else {
        let path = dir.join(CREDENTIALS_FILE);
        write_credentials(&summary.successes, std::fs::File::create(&path)?)?;
        info!(path = %path.display(), "Credentials written, store securely");
        Some(path)
    };

    let failures = if summary.failures.is_empty() {
        None
    } else {
        let path = dir.join(FAILURES_FILE);
        write_failures(&summary.failures, std::fs::File::create(&path)?)?;
        info!(path = %path.display(), "Failures written");
        Some(path)
    };

    let report = dir.join(REPORT_FILE);
    let html = render_report(summary, chrono::Local::now())?;
    std::fs::write(&report, html)?;
    info!(path = %report.display(), "Report written");

    Ok(OutputPaths {
        credentials,
        failures,
        report,
    })
}
