//! Database operations.
//!
//! # Tables
//!
//! - `product` - catalog of products (UUID TEXT ids, unique names)
//! - `location` - catalog of storage locations (UUID TEXT ids, unique names)
//! - `movement` - the append-only movement ledger
//!
//! Balances are never stored; they are derived by aggregation over `movement`
//! on every report request.
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/server/migrations/` via
//! [`sqlx::migrate!`] and exposed as [`MIGRATOR`] so the server binary, the
//! CLI, and the tests all run the same schema.

pub mod locations;
pub mod movements;
pub mod products;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use locations::LocationRepository;
pub use movements::MovementRepository;
pub use products::ProductRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A movement referenced a product or location id that does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Deletion blocked because the movement ledger references the entity.
    ///
    /// This is an expected outcome, not a fault: history must never be
    /// orphaned. The payload is the entity's display name for messaging.
    #[error("movement history exists for \"{0}\"")]
    HistoryExists(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign key enforcement is switched on for every connection; it is the
/// backstop behind the application-side referential checks.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MIGRATOR, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
    use std::str::FromStr;

    /// In-memory pool for repository tests.
    ///
    /// A single connection keeps every query on the same in-memory database.
    #[allow(clippy::expect_used)]
    pub async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid sqlite url")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("connect to in-memory sqlite");

        MIGRATOR.run(&pool).await.expect("run migrations");
        pool
    }
}
