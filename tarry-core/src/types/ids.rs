//! Strongly-typed identifiers for Tarry entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parse from the canonical hyphenated form.
            ///
            /// Returns `None` if the string is not a valid UUID.
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
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

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a single run (one traversal of a flow for one participant).
    RunUuid
);

uuid_id!(
    /// Identifier of a flow definition.
    FlowUuid
);

uuid_id!(
    /// Identifier of a router category; a wait timeout routes here on expiry.
    CategoryUuid
);

uuid_id!(
    /// Identifier of an inbound message.
    MsgUuid
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(RunUuid::new(), RunUuid::new());
    }

    #[test]
    fn parse_and_display_round_trip() {
        let id = CategoryUuid::parse("63fca57d-5ef6-4afd-9bcd-7bdcf653cea8").unwrap();
        assert_eq!(id.to_string(), "63fca57d-5ef6-4afd-9bcd-7bdcf653cea8");
        assert!(CategoryUuid::parse("not-a-uuid").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RunUuid::parse("9f7ede93-4b16-4692-80ad-b7dc54a1cd81").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"9f7ede93-4b16-4692-80ad-b7dc54a1cd81\"");
    }
}
