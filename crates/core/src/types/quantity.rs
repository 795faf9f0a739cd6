//! Validated movement quantities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a quantity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities must be strictly positive.
    #[error("quantity must be greater than zero (got {0})")]
    NotPositive(i64),
}

/// A strictly positive number of units moved in a single movement.
///
/// The sign of a quantity's contribution to a balance is determined by the
/// movement's endpoints (into a location = positive, out of it = negative),
/// never by the quantity itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Validate and wrap a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] if `value <= 0`.
    pub const fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
