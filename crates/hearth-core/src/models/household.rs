//! Household model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::Collection;
use crate::util::now_ms;

use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a household
    HouseholdId
);

/// A household grouping members, chores, and rewards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    /// Unique identifier
    pub id: HouseholdId,
    /// Display name
    pub name: String,
    /// Short shareable code used to join the household
    pub invite_code: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Timestamp of the most recent member activity (Unix ms)
    #[serde(default)]
    pub last_activity_at: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Household {
    /// Create a new household with a fresh invite code
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: HouseholdId::new(),
            name: name.into(),
            invite_code: generate_invite_code(),
            created_at: now,
            modified: now,
            last_activity_at: now,
            state: Lifecycle::Active,
        }
    }

    /// Record member activity at the given timestamp
    pub fn touch_activity(&mut self, timestamp: i64) {
        self.last_activity_at = self.last_activity_at.max(timestamp);
    }
}

impl Record for Household {
    const COLLECTION: Collection = Collection::Household;

    fn id(&self) -> String {
        self.id.as_str()
    }

    fn modified(&self) -> i64 {
        self.modified
    }

    fn set_modified(&mut self, modified: i64) {
        self.modified = modified;
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.state = lifecycle;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: i64) {
        self.created_at = created_at;
    }

    fn household(&self) -> Option<String> {
        None
    }

    fn last_activity(&self) -> Option<i64> {
        Some(self.last_activity_at)
    }

    fn set_last_activity(&mut self, timestamp: i64) {
        self.last_activity_at = timestamp;
    }
}

fn generate_invite_code() -> String {
    Uuid::now_v7().simple().to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_household_is_active_with_invite_code() {
        let household = Household::new("Maple Street");
        assert_eq!(household.name, "Maple Street");
        assert_eq!(household.invite_code.len(), 8);
        assert!(household.state.is_active());
        assert_eq!(household.created_at, household.modified);
    }

    #[test]
    fn touch_activity_never_moves_backward() {
        let mut household = Household::new("Test");
        let initial = household.last_activity_at;

        household.touch_activity(initial - 1000);
        assert_eq!(household.last_activity_at, initial);

        household.touch_activity(initial + 1000);
        assert_eq!(household.last_activity_at, initial + 1000);
    }
}
