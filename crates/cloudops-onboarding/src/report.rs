//! HTML report and console summary of an onboarding run.

use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::OnboardingError;
use crate::output::OutputPaths;
use crate::result::BatchSummary;

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>User Onboarding Report</title>
<style>
body { font-family: "Segoe UI", Arial, sans-serif; margin: 20px; background: #f5f5f5; color: #333; }
.header { background: #0078d4; color: #fff; padding: 20px; border-radius: 8px; }
.cards { display: flex; gap: 16px; margin: 20px 0; }
.card { background: #fff; padding: 16px 24px; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.15); }
.card .value { font-size: 28px; font-weight: bold; }
.success { color: #107c10; }
.failure { color: #d13438; }
table { width: 100%; border-collapse: collapse; background: #fff; margin-bottom: 24px; }
th, td { padding: 8px 12px; border-bottom: 1px solid #ddd; text-align: left; }
th { background: #f0f0f0; }
</style>
</head>
<body>
<div class="header">
<h1>User Onboarding Report</h1>
<p>Generated {{generated_at}}</p>
</div>
<div class="cards">
<div class="card"><div class="value">{{total}}</div>Total processed</div>
<div class="card"><div class="value success">{{succeeded}}</div>Succeeded</div>
<div class="card"><div class="value failure">{{failed}}</div>Failed</div>
<div class="card"><div class="value">{{success_rate}}%</div>Success rate</div>
<div class="card"><div class="value">{{hours_saved}} h</div>Estimated time saved</div>
</div>
{{#if successes}}
<h2 class="success">Successfully onboarded</h2>
<table>
<tr><th>User principal name</th><th>Display name</th><th>Department</th><th>Job title</th><th>License</th><th>Groups</th><th>Mailbox</th><th>Notes</th></tr>
{{#each successes}}
<tr><td>{{principal_name}}</td><td>{{display_name}}</td><td>{{department}}</td><td>{{job_title}}</td><td>{{license}}</td><td>{{groups}}</td><td>{{mailbox}}</td><td>{{notes}}</td></tr>
{{/each}}
</table>
{{/if}}
{{#if failures}}
<h2 class="failure">Failed</h2>
<table>
<tr><th>User principal name</th><th>Display name</th><th>Errors</th></tr>
{{#each failures}}
<tr><td>{{principal_name}}</td><td>{{display_name}}</td><td>{{errors}}</td></tr>
{{/each}}
</table>
{{/if}}
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct ReportView {
    generated_at: String,
    total: usize,
    succeeded: usize,
    failed: usize,
    success_rate: String,
    hours_saved: String,
    successes: Vec<SuccessRow>,
    failures: Vec<FailureRow>,
}

#[derive(Debug, Serialize)]
struct SuccessRow {
    principal_name: String,
    display_name: String,
    department: String,
    job_title: String,
    license: String,
    groups: String,
    mailbox: &'static str,
    notes: String,
}

#[derive(Debug, Serialize)]
struct FailureRow {
    principal_name: String,
    display_name: String,
    errors: String,
}

fn view(summary: &BatchSummary, generated_at: DateTime<Local>) -> ReportView {
    let successes = summary
        .successes
        .iter()
        .map(|p| {
            let groups = p
                .record
                .groups
                .iter()
                .map(|name| match p.result.groups.get(name) {
                    Some(true) => name.clone(),
                    _ => format!("{name} (failed)"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            SuccessRow {
                principal_name: p.record.principal_name.clone(),
                display_name: p.record.display_name(),
                department: p.record.department.clone().unwrap_or_default(),
                job_title: p.record.job_title.clone().unwrap_or_default(),
                license: p.record.license_tier.to_ascii_uppercase(),
                groups,
                mailbox: if p.result.mailbox_configured {
                    "Configured"
                } else {
                    "Not configured"
                },
                notes: p.result.notes.join("; "),
            }
        })
        .collect();

    let failures = summary
        .failures
        .iter()
        .map(|p| FailureRow {
            principal_name: p.record.principal_name.clone(),
            display_name: p.record.display_name(),
            errors: p.result.errors.join("; "),
        })
        .collect();

    ReportView {
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        total: summary.total(),
        succeeded: summary.successes.len(),
        failed: summary.failures.len(),
        success_rate: format!("{:.1}", summary.success_rate()),
        hours_saved: format!("{:.1}", summary.hours_saved()),
        successes,
        failures,
    }
}

/// Renders the HTML report. Every value is HTML-escaped.
///
/// # Errors
///
/// Returns [`OnboardingError::Report`] if rendering fails.
pub fn render_report(
    summary: &BatchSummary,
    generated_at: DateTime<Local>,
) -> Result<String, OnboardingError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("report", REPORT_TEMPLATE)?;
    Ok(handlebars.render("report", &view(summary, generated_at))?)
}

/// Plain-text summary printed at the end of a run.
#[must_use]
pub fn console_summary(summary: &BatchSummary, paths: &OutputPaths) -> String {
    let mut lines = vec![
        "ONBOARDING SUMMARY".to_string(),
        format!("Total processed:      {}", summary.total()),
        format!("Succeeded:            {}", summary.successes.len()),
        format!("Failed:               {}", summary.failures.len()),
        format!(
            "Estimated time saved: {:.1} hours ({} minutes)",
            summary.hours_saved(),
            summary.minutes_saved()
        ),
    ];
    if let Some(path) = &paths.credentials {
        lines.push(format!("Credentials:          {}", path.display()));
    }
    if let Some(path) = &paths.failures {
        lines.push(format!("Failures:             {}", path.display()));
    }
    lines.push(format!("Report:               {}", paths.report.display()));
    lines.join("\n")
}
