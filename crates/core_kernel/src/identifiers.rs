//! Strongly-typed identifiers for domain entities
//!
//! Identifiers come in two flavors. External identifiers (customer,
//! identification card number, catalog/field) are caller-supplied strings
//! that travel across system boundaries unchanged. Row identifiers
//! (address, command-log entry) are generated internally and wrap UUIDs.
//! Newtype wrappers prevent accidental mixing of identifier kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_external_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a caller-supplied value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

macro_rules! define_row_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Customer aggregate identifiers
define_external_id!(CustomerId);
define_external_id!(CardNumber);
define_external_id!(ScanId);

// Catalog schema identifiers
define_external_id!(CatalogId);
define_external_id!(FieldId);

// Internal row identifiers
define_row_id!(AddressId);
define_row_id!(CommandId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_display() {
        let id = CustomerId::new("cust-1");
        assert_eq!(id.to_string(), "cust-1");
        assert_eq!(id.as_str(), "cust-1");
    }

    #[test]
    fn test_external_id_parsing() {
        let original = CardNumber::new("ID-555");
        let parsed: CardNumber = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_row_id_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let address_id = AddressId::from(uuid);
        let back: Uuid = address_id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_row_ids_are_unique() {
        assert_ne!(CommandId::new(), CommandId::new());
    }
}
