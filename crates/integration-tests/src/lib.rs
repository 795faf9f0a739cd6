//! Integration test harness for Stockroom.
//!
//! Builds the full router against an in-memory `SQLite` database so tests
//! exercise real handlers, sessions, and SQL without a running server.
//! Requests are driven in-process via `tower::ServiceExt::oneshot`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use stockroom_server::config::ServerConfig;
use stockroom_server::db;
use stockroom_server::middleware::{create_session_layer, create_session_store};
use stockroom_server::state::AppState;

/// A router plus the pool it runs against, for asserting on database state.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// Configuration for tests. No environment variables are read.
fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        debug: true,
        session_secret: SecretString::from("integration-test-session-secret-0123456789"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the application against a fresh in-memory database.
///
/// The pool is capped at one connection: each `SQLite` `:memory:` connection
/// is its own database, so a larger pool would split state across databases.
pub async fn spawn_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("connect to in-memory sqlite");

    db::MIGRATOR.run(&pool).await.expect("run migrations");

    let store = create_session_store(&pool);
    store.migrate().await.expect("migrate session store");

    let config = test_config();
    let session_layer = create_session_layer(store, &config);
    let state = AppState::new(config, pool.clone());

    let router = stockroom_server::app(state).layer(session_layer);
    TestApp { router, pool }
}

impl TestApp {
    /// Issue a GET request.
    pub async fn get(&self, path: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        self.router.clone().oneshot(request).await.expect("request")
    }

    /// Issue a GET request carrying a session cookie.
    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("build request");
        self.router.clone().oneshot(request).await.expect("request")
    }

    /// Issue a form POST request.
    pub async fn post_form(&self, path: &str, body: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("build request");
        self.router.clone().oneshot(request).await.expect("request")
    }
}

/// Read a response body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

/// Read a response body as a UTF-8 string.
pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

/// Extract the session cookie pair from a response, if one was set.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let raw = set_cookie.to_str().ok()?;
    raw.split(';').next().map(str::to_owned)
}
