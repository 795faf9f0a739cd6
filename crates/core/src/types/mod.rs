//! Shared type definitions.

pub mod id;
pub mod name;
pub mod quantity;

pub use id::{LocationId, MovementId, ProductId};
pub use name::{EntityName, NameError};
pub use quantity::{Quantity, QuantityError};
