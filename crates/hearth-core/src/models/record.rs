//! Record trait and shared lifecycle state for synced entities.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;

/// Lifecycle of a replicated record.
///
/// A tombstoned record is logically absent from active views but stays in
/// the store so the deletion can propagate to the remote side and other
/// devices. Physical removal happens only through an explicit hard delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Active,
    Tombstoned,
}

impl Lifecycle {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn is_tombstoned(self) -> bool {
        matches!(self, Self::Tombstoned)
    }
}

/// Common surface of every synced entity.
///
/// `modified` is the sole ordering and conflict-resolution key; it mirrors
/// the remote change-tracking column and is restamped on every local write.
pub trait Record: Clone + Send + Serialize + DeserializeOwned + 'static {
    /// Collection this record type belongs to.
    const COLLECTION: Collection;

    /// String form of the record's unique id.
    fn id(&self) -> String;

    /// Last-write timestamp in Unix milliseconds.
    fn modified(&self) -> i64;

    fn set_modified(&mut self, modified: i64);

    fn lifecycle(&self) -> Lifecycle;

    fn set_lifecycle(&mut self, lifecycle: Lifecycle);

    /// Creation timestamp; zero means "not yet assigned".
    fn created_at(&self) -> i64;

    fn set_created_at(&mut self, created_at: i64);

    /// Grouping key for the household secondary index; `None` for records
    /// that are themselves households.
    fn household(&self) -> Option<String>;

    /// Activity-tracking field maximized on tie merges, where present.
    fn last_activity(&self) -> Option<i64> {
        None
    }

    fn set_last_activity(&mut self, _timestamp: i64) {}
}

/// Declares a UUID v7 (time-sortable) id newtype for one record type.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create a new unique ID using UUID v7
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Get the string representation of this ID
            #[must_use]
            pub fn as_str(&self) -> String {
                self.0.to_string()
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
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

pub(crate) use record_id;

#[cfg(test)]
mod tests {
    use super::*;

    record_id!(TestId);

    #[test]
    fn lifecycle_defaults_to_active() {
        assert_eq!(Lifecycle::default(), Lifecycle::Active);
        assert!(Lifecycle::Active.is_active());
        assert!(Lifecycle::Tombstoned.is_tombstoned());
    }

    #[test]
    fn lifecycle_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Lifecycle::Tombstoned).unwrap(),
            "\"tombstoned\""
        );
    }

    #[test]
    fn record_id_is_unique_and_parses_back() {
        let id1 = TestId::new();
        let id2 = TestId::new();
        assert_ne!(id1, id2);

        let parsed: TestId = id1.as_str().parse().unwrap();
        assert_eq!(id1, parsed);
    }
}
