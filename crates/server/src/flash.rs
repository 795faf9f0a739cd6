//! Session-backed flash messages.
//!
//! Every mutating route follows POST-redirect-GET: the outcome (success or a
//! human-readable rejection) is queued in the session here and drained by the
//! next page render. Messages survive exactly one redirect.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key under which pending flash messages are stored.
const FLASH_KEY: &str = "flash";

/// Severity of a flash message, mapped to a CSS class in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    /// CSS class used by the base template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Error => "flash-error",
        }
    }
}

/// A single flash message queued for the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Queue a flash message in the session.
///
/// # Errors
///
/// Returns the session store error if the session cannot be read or written.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queue.push(Flash {
        level,
        message: message.into(),
    });
    session.insert(FLASH_KEY, queue).await
}

/// Queue a success message.
///
/// # Errors
///
/// Returns the session store error if the session cannot be written.
pub async fn success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashLevel::Success, message).await
}

/// Queue an error message.
///
/// # Errors
///
/// Returns the session store error if the session cannot be written.
pub async fn error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashLevel::Error, message).await
}

/// Take all pending flash messages, clearing them from the session.
///
/// # Errors
///
/// Returns the session store error if the session cannot be read or written.
pub async fn take(session: &Session) -> Result<Vec<Flash>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_level_css_class() {
        assert_eq!(FlashLevel::Success.css_class(), "flash-success");
        assert_eq!(FlashLevel::Error.css_class(), "flash-error");
    }

    #[test]
    fn test_flash_serde_roundtrip() {
        let flash = Flash {
            level: FlashLevel::Error,
            message: "Product name cannot be empty.".to_string(),
        };
        let json = serde_json::to_string(&flash).expect("serialize");
        let back: Flash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(flash, back);
    }
}
