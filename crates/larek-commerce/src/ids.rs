//! Newtype IDs for type-safe identifiers.
//!
//! Identifiers are assigned by the remote API; the storefront never mints
//! its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A server-assigned identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "854cef69-976d-4c2a-a18c-2aa45046c390".into();
        assert_eq!(id.as_str(), "854cef69-976d-4c2a-a18c-2aa45046c390");
    }

    #[test]
    fn test_id_serializes_as_bare_string() {
        let id = OrderId::new("o1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"o1\"");
        let back: OrderId = serde_json::from_str("\"o1\"").unwrap();
        assert_eq!(back, id);
    }
}
