//! Chore completion model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::chore::{Chore, ChoreId};
use super::household::HouseholdId;
use super::member::MemberId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a chore completion
    CompletionId
);

/// Review state of a claimed completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// Awaiting admin review
    #[default]
    Pending,
    /// Points awarded
    Approved,
    /// Claim rejected, no points awarded
    Rejected,
}

/// A member's claim that a chore was done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier
    pub id: CompletionId,
    /// Household this completion belongs to
    pub household_id: HouseholdId,
    /// Chore that was completed
    pub chore_id: ChoreId,
    /// Member who completed it
    pub member_id: MemberId,
    /// Review state
    #[serde(default)]
    pub status: CompletionStatus,
    /// Points captured from the chore at completion time
    pub points_awarded: i64,
    /// When the chore was completed (Unix ms)
    pub completed_at: i64,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Completion {
    /// Record a completion of the given chore by a member.
    ///
    /// The point value is captured from the chore at claim time so later
    /// edits to the chore do not change already-earned points.
    #[must_use]
    pub fn new(chore: &Chore, member_id: MemberId) -> Self {
        let now = now_ms();
        Self {
            id: CompletionId::new(),
            household_id: chore.household_id,
            chore_id: chore.id,
            member_id,
            status: CompletionStatus::Pending,
            points_awarded: chore.points,
            completed_at: now,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }

    pub fn approve(&mut self) {
        self.status = CompletionStatus::Approved;
    }

    pub fn reject(&mut self) {
        self.status = CompletionStatus::Rejected;
    }
}

impl Record for Completion {
    const COLLECTION: Collection = Collection::Completion;

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
    fn completion_captures_chore_points() {
        let chore = Chore::new(HouseholdId::new(), "Vacuum", 15);
        let completion = Completion::new(&chore, MemberId::new());

        assert_eq!(completion.points_awarded, 15);
        assert_eq!(completion.chore_id, chore.id);
        assert_eq!(completion.status, CompletionStatus::Pending);
    }

    #[test]
    fn approve_and_reject_transition_status() {
        let chore = Chore::new(HouseholdId::new(), "Vacuum", 15);
        let mut completion = Completion::new(&chore, MemberId::new());

        completion.approve();
        assert_eq!(completion.status, CompletionStatus::Approved);

        completion.reject();
        assert_eq!(completion.status, CompletionStatus::Rejected);
    }
}
