//! Validated display names for catalog entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted name length in characters.
const MAX_NAME_CHARS: usize = 120;

/// Errors from parsing an entity name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// The name was empty or whitespace-only.
    #[error("name cannot be empty")]
    Empty,

    /// The name exceeded the maximum length.
    #[error("name too long ({0} characters, max {MAX_NAME_CHARS})")]
    TooLong(usize),
}

/// A validated, trimmed, non-empty name for a product or location.
///
/// Construct via [`EntityName::parse`]; a value of this type is guaranteed to
/// be non-empty after trimming and within the length limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Parse and validate a name from raw form input.
    ///
    /// Leading and trailing whitespace is stripped before validation.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for empty or whitespace-only input and
    /// [`NameError::TooLong`] when the trimmed name exceeds the limit.
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        let chars = trimmed.chars().count();
        if chars > MAX_NAME_CHARS {
            return Err(NameError::TooLong(chars));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let name = EntityName::parse("  Warehouse A  ").unwrap();
        assert_eq!(name.as_str(), "Warehouse A");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(EntityName::parse(""), Err(NameError::Empty));
        assert_eq!(EntityName::parse("   "), Err(NameError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "x".repeat(MAX_NAME_CHARS + 1);
        assert!(matches!(
            EntityName::parse(&long),
            Err(NameError::TooLong(_))
        ));
    }

    #[test]
    fn test_parse_accepts_max_length() {
        let max = "x".repeat(MAX_NAME_CHARS);
        assert!(EntityName::parse(&max).is_ok());
    }
}
