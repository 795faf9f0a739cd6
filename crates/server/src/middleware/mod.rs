//! HTTP middleware for the server.
//!
//! The session layer backs the flash messages used by every mutating route.

pub mod session;

pub use session::{create_session_layer, create_session_store};
