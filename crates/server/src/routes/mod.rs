//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB connectivity)
//!
//! # Dashboard
//! GET  /                       - Balance report + recent movements
//!
//! # Products
//! GET  /products               - Product listing + creation form
//! POST /products/add           - Create product
//! POST /products/{id}/edit     - Rename product
//! POST /products/{id}/delete   - Delete product (blocked if history exists)
//!
//! # Locations
//! GET  /locations              - Location listing + creation form
//! POST /locations/add          - Create location
//! POST /locations/{id}/edit    - Rename location
//! POST /locations/{id}/delete  - Delete location (blocked if history exists)
//!
//! # Movements (append-only: no edit or delete routes)
//! GET  /movements              - Movement ledger + record form
//! POST /movements/add          - Record movement
//!
//! # Report
//! GET  /report/download        - Balance report as PDF attachment
//! ```
//!
//! All POST handlers follow POST-redirect-GET: outcomes (including expected
//! rejections like duplicate names or delete-blocked-by-history) are flashed
//! to the session and shown on the next page render.

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};

use crate::state::AppState;

pub mod dashboard;
pub mod locations;
pub mod movements;
pub mod products;
pub mod report;

/// Build the page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Dashboard
        .route("/", get(dashboard::index))
        // Products
        .route("/products", get(products::index))
        .route("/products/add", post(products::create))
        .route("/products/{id}/edit", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        // Locations
        .route("/locations", get(locations::index))
        .route("/locations/add", post(locations::create))
        .route("/locations/{id}/edit", post(locations::update))
        .route("/locations/{id}/delete", post(locations::delete))
        // Movements
        .route("/movements", get(movements::index))
        .route("/movements/add", post(movements::create))
        // Report
        .route("/report/download", get(report::download))
}

/// Format a timestamp for display in templates.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
