//! Reward and redemption models

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::household::HouseholdId;
use super::member::MemberId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a reward
    RewardId
);

record_id!(
    /// A unique identifier for a reward redemption
    RedemptionId
);

/// Something members can spend points on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Unique identifier
    pub id: RewardId,
    /// Household this reward belongs to
    pub household_id: HouseholdId,
    /// Short title
    pub title: String,
    /// Point cost per redemption
    pub cost: i64,
    /// Remaining stock; `None` means unlimited
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Reward {
    /// Create a new unlimited reward
    #[must_use]
    pub fn new(household_id: HouseholdId, title: impl Into<String>, cost: i64) -> Self {
        let now = now_ms();
        Self {
            id: RewardId::new(),
            household_id,
            title: title.into(),
            cost,
            quantity: None,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }

    /// Whether at least one redemption is still available.
    ///
    /// Quantity limits are enforced authoritatively by the server; this is
    /// the optimistic local check.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.quantity.map_or(true, |remaining| remaining > 0)
    }
}

impl Record for Reward {
    const COLLECTION: Collection = Collection::Reward;

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

/// A member spending points on a reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    /// Unique identifier
    pub id: RedemptionId,
    /// Household this redemption belongs to
    pub household_id: HouseholdId,
    /// Reward that was redeemed
    pub reward_id: RewardId,
    /// Member who redeemed it
    pub member_id: MemberId,
    /// Point cost captured from the reward at redemption time
    pub cost_paid: i64,
    /// When the redemption happened (Unix ms)
    pub redeemed_at: i64,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl Redemption {
    /// Record a redemption of the given reward by a member
    #[must_use]
    pub fn new(reward: &Reward, member_id: MemberId) -> Self {
        let now = now_ms();
        Self {
            id: RedemptionId::new(),
            household_id: reward.household_id,
            reward_id: reward.id,
            member_id,
            cost_paid: reward.cost,
            redeemed_at: now,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }
}

impl Record for Redemption {
    const COLLECTION: Collection = Collection::Redemption;

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
    fn unlimited_reward_is_always_available() {
        let reward = Reward::new(HouseholdId::new(), "Movie night", 50);
        assert!(reward.is_available());
    }

    #[test]
    fn zero_quantity_reward_is_unavailable() {
        let mut reward = Reward::new(HouseholdId::new(), "Ice cream", 20);
        reward.quantity = Some(0);
        assert!(!reward.is_available());

        reward.quantity = Some(3);
        assert!(reward.is_available());
    }

    #[test]
    fn redemption_captures_reward_cost() {
        let reward = Reward::new(HouseholdId::new(), "Movie night", 50);
        let redemption = Redemption::new(&reward, MemberId::new());

        assert_eq!(redemption.cost_paid, 50);
        assert_eq!(redemption.reward_id, reward.id);
        assert_eq!(redemption.household_id, reward.household_id);
    }
}
