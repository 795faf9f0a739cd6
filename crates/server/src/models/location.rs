//! Location model.

use chrono::{DateTime, Utc};

use stockroom_core::{EntityName, LocationId};

/// A storage location (warehouse, shelf, store) stock can move through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub name: EntityName,
    pub created_at: DateTime<Utc>,
}
