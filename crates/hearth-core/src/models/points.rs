//! Manual point adjustment model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::household::HouseholdId;
use super::member::MemberId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a point adjustment
    PointAdjustmentId
);

/// A manual credit or debit against a member's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAdjustment {
    /// Unique identifier
    pub id: PointAdjustmentId,
    /// Household this adjustment belongs to
    pub household_id: HouseholdId,
    /// Member whose balance is adjusted
    pub member_id: MemberId,
    /// Signed point delta; negative for deductions
    pub delta: i64,
    /// Human-readable reason
    pub reason: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl PointAdjustment {
    /// Create a new adjustment for a member
    #[must_use]
    pub fn new(
        household_id: HouseholdId,
        member_id: MemberId,
        delta: i64,
        reason: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            id: PointAdjustmentId::new(),
            household_id,
            member_id,
            delta,
            reason: reason.into(),
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }
}

impl Record for PointAdjustment {
    const COLLECTION: Collection = Collection::PointAdjustment;

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
