//! Stockroom server library.
//!
//! The web application is exposed as a library so the CLI (migrations,
//! seeding) and the integration tests can reuse the repositories and build
//! the router in-process. The `stockroom-server` binary in `main.rs` is a
//! thin wrapper that loads configuration and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the application router (health endpoints plus all pages).
///
/// Middleware layers (sessions, tracing, Sentry) are applied by the caller:
/// the binary attaches the full stack, tests attach only what they exercise.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
