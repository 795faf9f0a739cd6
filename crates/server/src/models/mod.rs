//! Domain models.

pub mod location;
pub mod movement;
pub mod product;

pub use location::Location;
pub use movement::{Balance, Movement, MovementRecord, MovementShapeError, NewMovement};
pub use product::Product;
