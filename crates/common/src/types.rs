use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::IdError;

/// Declares a UUID-backed identifier newtype.
///
/// Each identifier wraps a UUID so that a cart id can never be passed where a
/// user id is expected. Parsing trims surrounding whitespace and reports a
/// [`IdError`] naming the identifier kind.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier supplied by a caller.
            pub fn parse(value: &str) -> Result<Self, IdError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(IdError::Missing { kind: $kind });
                }
                Uuid::parse_str(trimmed)
                    .map(Self)
                    .map_err(|_| IdError::Malformed {
                        kind: $kind,
                        value: trimmed.to_string(),
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifier of the shopper owning a cart or an order.
    UserId,
    "user_id"
);

uuid_id!(
    /// Identifier of a cart record.
    CartId,
    "cart_id"
);

uuid_id!(
    /// Identifier of a catalog product.
    ProductId,
    "product_id"
);

uuid_id!(
    /// Identifier of a placed order.
    OrderId,
    "order_id"
);
