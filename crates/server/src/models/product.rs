//! Product model.

use chrono::{DateTime, Utc};

use stockroom_core::{EntityName, ProductId};

/// A product tracked by the inventory system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: EntityName,
    pub created_at: DateTime<Utc>,
}
