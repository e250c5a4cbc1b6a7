//! Polar Scoop CLI - Session-store migrations and diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Create the sessions table (run once before first boot)
//! ps-cli migrate
//!
//! # Validate configuration and check the platform API and session store
//! ps-cli check
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session-store schema
//! - `check` - Diagnose configuration, platform API, and database health

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(author, version, about = "Polar Scoop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session-store schema
    Migrate,
    /// Validate configuration and check service health
    Check,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}
