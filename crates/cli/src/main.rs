//! Ecosave CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Apply the SQL migrations in crates/api/migrations/
//! ecosave-cli migrate
//!
//! # Insert a demo room, user, device and consumption readings
//! ecosave-cli seed
//! ```
//!
//! Both commands read `ECOSAVE_DATABASE_URL` (falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ecosave-cli")]
#[command(author, version, about = "Ecosave CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo data
    Seed {
        /// Total cost of the demo readings; above 2250 the user evaluates as "Alto"
        #[arg(long, default_value_t = 2400)]
        total_cost: u32,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { total_cost } => commands::seed::demo(total_cost).await?,
    }
    Ok(())
}
