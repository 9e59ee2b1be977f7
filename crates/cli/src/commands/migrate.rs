//! Database migration command.
//!
//! # Migration Files
//!
//! `crates/api/migrations/`, embedded at compile time:
//! ```text
//! migrations/
//! └── 20260301000001_create_ecosave_schema.sql
//! ```

use ecosave_api::db;

use super::{CommandError, database_url};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the URL is missing, the database is unreachable or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
