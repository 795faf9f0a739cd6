//! Database migration command.
//!
//! The server also applies pending migrations on startup; this command
//! exists for applying them ahead of a deploy or from a maintenance shell.

use tracing::info;

use stockroom_server::db;

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if `STOCKROOM_DATABASE_URL` is unset, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;
    info!("Migrations complete!");

    Ok(())
}
