//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. Sessions carry only
//! flash messages, so the expiry is short and the cookie is same-site strict.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stockroom_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the `SQLite` session store.
///
/// The caller must run `store.migrate()` once at startup to create the
/// session table.
#[must_use]
pub fn create_session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Create the session layer over a migrated store.
///
/// The cookie is marked secure outside debug mode; local development runs
/// over plain HTTP.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &ServerConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(!config.debug)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
