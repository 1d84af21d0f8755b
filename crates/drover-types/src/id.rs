use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a time-ordered entity identifier (UUID v7).
///
/// All entity ids share the same surface: `new` generates a v7 UUID so ids
/// sort by creation time, `short_id` gives the first 8 characters for logs
/// and terminal output.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered id (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

entity_id! {
    /// Identifier for a ranch.
    RanchId
}

entity_id! {
    /// Identifier for a tracked animal.
    CalfId
}

entity_id! {
    /// Identifier for a shipment event.
    LoadId
}

entity_id! {
    /// Identifier for a calf-to-load linkage row.
    CalfLoadId
}

entity_id! {
    /// Identifier for a movement-history record.
    ///
    /// Because ids are UUID v7, sorting by id breaks ties between records
    /// that share an event date.
    MovementId
}

entity_id! {
    /// Identifier for a canonical breed row.
    BreedId
}

entity_id! {
    /// Identifier for a canonical seller row.
    SellerId
}
