//! Type-safe identifier wrappers.
//!
//! Skill and session records are keyed by UUID v7 (time-ordered) wrappers
//! so the compiler prevents accidental mixing of identifiers. Users are
//! different: the identity provider issues opaque subject strings (e.g.
//! `user_2abcXYZ`), so [`UserId`] wraps a [`String`] and is compared
//! byte-for-byte, never parsed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a tracked skill record.
    SkillId
}

define_id! {
    /// Unique identifier for a transient challenge session.
    SessionId
}

/// Opaque user identifier issued by the external identity provider.
///
/// Scopes every [`Skill`](crate::Skill) and the single
/// [`ProgressLedger`](crate::ProgressLedger) per user. The engine never
/// inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a raw subject string.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// Borrow the raw subject string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(subject: &str) -> Self {
        Self(String::from(subject))
    }
}

impl From<String> for UserId {
    fn from(subject: String) -> Self {
        Self(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_ids_are_unique() {
        assert_ne!(SkillId::new(), SkillId::new());
    }

    #[test]
    fn user_id_preserves_subject() {
        let id = UserId::from("user_2abcXYZ");
        assert_eq!(id.as_str(), "user_2abcXYZ");
        assert_eq!(id.to_string(), "user_2abcXYZ");
    }

    #[test]
    fn ids_serialize_transparently_enough() {
        let session = SessionId::new();
        let json = serde_json::to_string(&session).unwrap_or_default();
        // A bare UUID string, not an object.
        assert!(json.starts_with('"'));
    }
}
