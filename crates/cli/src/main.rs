//! Copperleaf CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! copperleaf-cli migrate storefront
//!
//! # Run functions database migrations
//! copperleaf-cli migrate functions
//!
//! # Run all database migrations
//! copperleaf-cli migrate all
//!
//! # Seed role hierarchy reference data and a demo catalog
//! copperleaf-cli seed
//!
//! # Grant the admin role to an existing profile
//! copperleaf-cli admin grant -e owner@example.com
//!
//! # Delete expired, never-accepted invites
//! copperleaf-cli invites prune
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed reference data (role hierarchy, demo catalog)
//! - `admin grant` - Set a profile's role to admin
//! - `invites prune` - Delete expired pending invites

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "copperleaf-cli")]
#[command(author, version, about = "Copperleaf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Seed reference data: role hierarchy and a demo catalog
    Seed,
    /// Manage admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Invite maintenance
    Invites {
        #[command(subcommand)]
        action: InviteAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
    /// Run functions database migrations
    Functions,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum InviteAction {
    /// Delete expired, never-accepted invites
    Prune,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Set an existing profile's role to admin.
    ///
    /// This is the only role-change surface outside invitations; the
    /// super-admin gate additionally requires `SUPER_ADMIN_EMAIL` to match.
    Grant {
        /// Profile email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Functions => commands::migrate::functions().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::functions().await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => {
                commands::admin::grant(&email).await?;
            }
        },
        Commands::Invites { action } => match action {
            InviteAction::Prune => commands::invites::prune().await?,
        },
    }
    Ok(())
}
