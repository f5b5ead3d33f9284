//! Household member model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::household::HouseholdId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a household member
    MemberId
);

/// Member role within a household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Can manage chores, rewards, and other members
    Admin,
    /// Regular participant
    #[default]
    Member,
}

/// A person in a household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,
    /// Household this member belongs to
    pub household_id: HouseholdId,
    /// Display name
    pub display_name: String,
    /// Role within the household
    #[serde(default)]
    pub role: MemberRole,
    /// Current points balance (server-authoritative; cached locally)
    #[serde(default)]
    pub points_balance: i64,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Member {
    /// Create a new member of the given household
    #[must_use]
    pub fn new(household_id: HouseholdId, display_name: impl Into<String>, role: MemberRole) -> Self {
        let now = now_ms();
        Self {
            id: MemberId::new(),
            household_id,
            display_name: display_name.into(),
            role,
            points_balance: 0,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, MemberRole::Admin)
    }
}

impl Record for Member {
    const COLLECTION: Collection = Collection::Member;

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
        Some(self.household_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_member_starts_with_zero_balance() {
        let member = Member::new(HouseholdId::new(), "Alex", MemberRole::Admin);
        assert_eq!(member.points_balance, 0);
        assert!(member.is_admin());
    }

    #[test]
    fn role_defaults_to_member() {
        assert_eq!(MemberRole::default(), MemberRole::Member);
    }
}
