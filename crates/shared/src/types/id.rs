//! Typed IDs for type-safe document references.
//!
//! Documents in the store are keyed by opaque strings. Wrapping them prevents
//! accidentally passing a `ListId` where a `BoardId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates a new random ID from a time-ordered UUID v7.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(BoardId, "Unique identifier for a board.");
typed_id!(SwimlaneId, "Unique identifier for a swimlane.");
typed_id!(ListId, "Unique identifier for a list (board column).");
typed_id!(
    CustomFieldId,
    "Unique identifier for a custom field definition."
);
typed_id!(UserId, "Unique identifier for a user.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
