//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_uuid_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog entities
//! (products, locations) are identified by UUIDs; movement ledger rows use a
//! monotonically increasing integer assigned by the database.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe UUID-backed ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `generate()` for fresh v4 IDs and `parse()` for path/form input
/// - `Display` as the hyphenated form (matches TEXT storage in the database)
///
/// # Example
///
/// ```rust
/// # use stockroom_core::define_uuid_id;
/// define_uuid_id!(ProductId);
/// define_uuid_id!(LocationId);
///
/// let product_id = ProductId::generate();
/// let location_id = LocationId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = location_id;
/// ```
#[macro_export]
macro_rules! define_uuid_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Parse an ID from its string form.
            ///
            /// # Errors
            ///
            /// Returns `uuid::Error` if the string is not a valid UUID.
            pub fn parse(s: &str) -> ::core::result::Result<Self, ::uuid::Error> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define catalog entity IDs
define_uuid_id!(ProductId);
define_uuid_id!(LocationId);

/// ID of a movement ledger row.
///
/// Assigned by the database (autoincrement) when the movement is recorded;
/// never supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(i64);

impl MovementId {
    /// Wrap a database-assigned row ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MovementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovementId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<MovementId> for i64 {
    fn from(id: MovementId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = LocationId::generate();
        let parsed = LocationId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ProductId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_movement_id_display() {
        assert_eq!(MovementId::new(42).to_string(), "42");
    }
}
