//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ipufood migrate
//! ```
//!
//! Migrations live in `crates/server/migrations/` and are embedded at compile
//! time. The `tower_sessions.session` table is created by them too.

use super::{CliError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
