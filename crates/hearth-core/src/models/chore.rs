//! Chore model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::household::HouseholdId;
use super::member::MemberId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a chore
    ChoreId
);

/// A task worth points within a household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    /// Unique identifier
    pub id: ChoreId,
    /// Household this chore belongs to
    pub household_id: HouseholdId,
    /// Short title
    pub title: String,
    /// Points awarded on completion
    pub points: i64,
    /// Member the chore is assigned to, if any
    #[serde(default)]
    pub assigned_to: Option<MemberId>,
    /// Due timestamp (Unix ms), if any
    #[serde(default)]
    pub due_at: Option<i64>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Chore {
    /// Create a new unassigned chore
    #[must_use]
    pub fn new(household_id: HouseholdId, title: impl Into<String>, points: i64) -> Self {
        let now = now_ms();
        Self {
            id: ChoreId::new(),
            household_id,
            title: title.into(),
            points,
            assigned_to: None,
            due_at: None,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }

    /// Assign this chore to a member
    pub fn assign(&mut self, member_id: MemberId) {
        self.assigned_to = Some(member_id);
    }

    /// Whether the chore is past its due timestamp
    #[must_use]
    pub fn is_overdue(&self, now: i64) -> bool {
        self.due_at.is_some_and(|due| due < now)
    }
}

impl Record for Chore {
    const COLLECTION: Collection = Collection::Chore;

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
