//! Movement ledger models.
//!
//! A movement is a single recorded transfer of a quantity of a product into
//! and/or out of a location. Movements are immutable once recorded: the
//! ledger is append-only, and balances are always derived from it by
//! aggregation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockroom_core::{LocationId, MovementId, ProductId, Quantity, QuantityError};

/// A recorded movement as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub id: MovementId,
    pub recorded_at: DateTime<Utc>,
    pub product_id: ProductId,
    pub from_location_id: Option<LocationId>,
    pub to_location_id: Option<LocationId>,
    pub qty: Quantity,
}

/// Errors from constructing a [`NewMovement`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovementShapeError {
    /// Quantity was zero or negative.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// Neither a source nor a destination location was given.
    #[error("movement must have a \"from\" or \"to\" location (or both)")]
    NoEndpoints,

    /// Source and destination are the same location.
    #[error("source and destination locations cannot be the same")]
    SameEndpoints,
}

/// A validated request to record a movement.
///
/// Can only be constructed when the movement shape is valid: strictly
/// positive quantity, at least one endpoint set, and distinct endpoints when
/// both are set. A purchase has only a destination, a sale only a source,
/// and a transfer both.
///
/// Whether the referenced product and location ids actually exist is checked
/// against the database when the movement is recorded, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    product_id: ProductId,
    from_location_id: Option<LocationId>,
    to_location_id: Option<LocationId>,
    qty: Quantity,
}

impl NewMovement {
    /// Validate a movement request.
    ///
    /// # Errors
    ///
    /// Returns [`MovementShapeError`] if the quantity is not positive, both
    /// endpoints are empty, or both endpoints name the same location.
    pub fn new(
        product_id: ProductId,
        from_location_id: Option<LocationId>,
        to_location_id: Option<LocationId>,
        qty: i64,
    ) -> Result<Self, MovementShapeError> {
        let qty = Quantity::new(qty)?;

        if from_location_id.is_none() && to_location_id.is_none() {
            return Err(MovementShapeError::NoEndpoints);
        }

        if let (Some(from), Some(to)) = (from_location_id, to_location_id)
            && from == to
        {
            return Err(MovementShapeError::SameEndpoints);
        }

        Ok(Self {
            product_id,
            from_location_id,
            to_location_id,
            qty,
        })
    }

    /// The product being moved.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// The source location, if any.
    #[must_use]
    pub const fn from_location_id(&self) -> Option<LocationId> {
        self.from_location_id
    }

    /// The destination location, if any.
    #[must_use]
    pub const fn to_location_id(&self) -> Option<LocationId> {
        self.to_location_id
    }

    /// The validated quantity.
    #[must_use]
    pub const fn qty(&self) -> Quantity {
        self.qty
    }
}

/// A movement joined with product and location names for display.
#[derive(Debug, Clone)]
pub struct MovementRecord {
    pub id: MovementId,
    pub recorded_at: DateTime<Utc>,
    pub product_name: String,
    pub from_location_name: Option<String>,
    pub to_location_name: Option<String>,
    pub qty: i64,
}

/// A derived balance row: net quantity of one product at one location.
///
/// Present for every (product, location) pair with at least one contributing
/// movement, including pairs whose net is zero or negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub product_name: String,
    pub location_name: String,
    pub qty: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> ProductId {
        ProductId::generate()
    }

    fn location() -> LocationId {
        LocationId::generate()
    }

    #[test]
    fn test_purchase_shape() {
        // Purchase: destination only
        let m = NewMovement::new(product(), None, Some(location()), 10).unwrap();
        assert!(m.from_location_id().is_none());
        assert!(m.to_location_id().is_some());
        assert_eq!(m.qty().as_i64(), 10);
    }

    #[test]
    fn test_sale_shape() {
        // Sale: source only
        let m = NewMovement::new(product(), Some(location()), None, 3).unwrap();
        assert!(m.from_location_id().is_some());
        assert!(m.to_location_id().is_none());
    }

    #[test]
    fn test_transfer_shape() {
        let m = NewMovement::new(product(), Some(location()), Some(location()), 4).unwrap();
        assert!(m.from_location_id().is_some());
        assert!(m.to_location_id().is_some());
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let err = NewMovement::new(product(), None, Some(location()), 0).unwrap_err();
        assert!(matches!(err, MovementShapeError::Quantity(_)));
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let err = NewMovement::new(product(), None, Some(location()), -7).unwrap_err();
        assert!(matches!(err, MovementShapeError::Quantity(_)));
    }

    #[test]
    fn test_rejects_no_endpoints() {
        let err = NewMovement::new(product(), None, None, 5).unwrap_err();
        assert_eq!(err, MovementShapeError::NoEndpoints);
    }

    #[test]
    fn test_rejects_same_endpoints() {
        let loc = location();
        let err = NewMovement::new(product(), Some(loc), Some(loc), 5).unwrap_err();
        assert_eq!(err, MovementShapeError::SameEndpoints);
    }
}
