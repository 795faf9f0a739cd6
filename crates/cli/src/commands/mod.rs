//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;

use stockroom_server::db;

/// Connect to the database named by `STOCKROOM_DATABASE_URL` (falling back
/// to `DATABASE_URL`).
pub(crate) async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOCKROOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "STOCKROOM_DATABASE_URL not set")?;

    Ok(db::create_pool(&database_url).await?)
}
