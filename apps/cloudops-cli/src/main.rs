//! cloudops CLI - Azure administration tools
//!
//! - `onboard`: bulk-create Entra ID users from a CSV file, with licenses,
//!   group memberships and mailbox settings
//! - `monitor`: render an HTML health dashboard for a subscription
//! - `users`: list every user in the tenant

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;

use error::CliResult;

/// cloudops CLI - Azure onboarding and monitoring
#[derive(Parser)]
#[command(name = "cloudops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Onboard new users from a CSV file
    Onboard(commands::onboard::OnboardArgs),

    /// Generate the Azure health dashboard
    Monitor(commands::monitor::MonitorArgs),

    /// List users in the tenant
    Users(commands::users::UsersArgs),
}

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Onboard(args) => commands::onboard::execute(args).await,
        Commands::Monitor(args) => commands::monitor::execute(args).await,
        Commands::Users(args) => commands::users::execute(args).await,
    }
}
