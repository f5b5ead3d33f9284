//! Closed set of synced entity collections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tag identifying one replicated collection.
///
/// Every collection maps to one local table and one remote table of the same
/// name; generic store and sync code dispatches over this enum instead of
/// raw table-name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Household,
    Member,
    Chore,
    Completion,
    Reward,
    Redemption,
    PointAdjustment,
    NotificationPreference,
}

impl Collection {
    /// All known collections, in sync order.
    pub const ALL: [Self; 8] = [
        Self::Household,
        Self::Member,
        Self::Chore,
        Self::Completion,
        Self::Reward,
        Self::Redemption,
        Self::PointAdjustment,
        Self::NotificationPreference,
    ];

    /// Table name used both locally and on the remote side.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Household => "households",
            Self::Member => "members",
            Self::Chore => "chores",
            Self::Completion => "completions",
            Self::Reward => "rewards",
            Self::Redemption => "redemptions",
            Self::PointAdjustment => "point_adjustments",
            Self::NotificationPreference => "notification_preferences",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|collection| collection.table() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown collection: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_round_trip_through_from_str() {
        for collection in Collection::ALL {
            let parsed: Collection = collection.table().parse().unwrap();
            assert_eq!(parsed, collection);
        }
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        assert!("notes".parse::<Collection>().is_err());
    }
}
