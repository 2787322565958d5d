//! Users command - List every user in the tenant

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use cloudops_azure::AzureConfig;
use cloudops_onboarding::{Directory, GraphDirectory, TenantUser};

use crate::error::CliResult;
use crate::logging::init_logging;

/// Arguments for the users command
#[derive(Args)]
pub struct UsersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Execute the users command
pub async fn execute(args: UsersArgs) -> CliResult<()> {
    init_logging(args.log_file.as_deref())?;

    let azure = AzureConfig::from_env()?;
    let directory = GraphDirectory::from_config(&azure)?;
    let users = directory.list_users().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else {
        print!("{}", render_user_list(&users));
    }
    Ok(())
}

fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// Renders one detail block per user followed by the total.
fn render_user_list(users: &[TenantUser]) -> String {
    let mut out = String::new();
    if users.is_empty() {
        out.push_str("No users found.\n");
        return out;
    }

    for user in users {
        let _ = writeln!(
            out,
            "User: {}",
            or_default(user.display_name.as_deref(), &user.user_principal_name)
        );
        let _ = writeln!(out, "{}", "\u{2501}".repeat(50));
        let _ = writeln!(out, "Principal name: {}", user.user_principal_name);
        let _ = writeln!(
            out,
            "Email:          {}",
            or_default(user.mail.as_deref(), "No email configured")
        );
        let status = match user.account_enabled {
            Some(true) => "Enabled",
            Some(false) => "Disabled",
            None => "Unknown",
        };
        let _ = writeln!(out, "Account:        {status}");
        let _ = writeln!(
            out,
            "User type:      {}",
            or_default(user.user_type.as_deref(), "Not specified")
        );
        let _ = writeln!(
            out,
            "Job title:      {}",
            or_default(user.job_title.as_deref(), "Not specified")
        );
        let _ = writeln!(
            out,
            "Department:     {}",
            or_default(user.department.as_deref(), "Not specified")
        );
        let _ = writeln!(
            out,
            "Office:         {}",
            or_default(user.office_location.as_deref(), "Not specified")
        );
        let created = user
            .created_date_time
            .map_or_else(
                || "Not specified".to_string(),
                |t| t.format("%Y-%m-%d %H:%M").to_string(),
            );
        let _ = writeln!(out, "Created:        {created}");
        out.push('\n');
    }

    let _ = writeln!(out, "Total users found: {}", users.len());
    out
}
