//! Notification preference model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::util::now_ms;

use super::household::HouseholdId;
use super::member::MemberId;
use super::record::{record_id, Lifecycle, Record};

record_id!(
    /// A unique identifier for a notification preference record
    NotificationPreferenceId
);

/// How often a summary digest is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestCadence {
    #[default]
    Off,
    Daily,
    Weekly,
}

/// Per-member notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    /// Unique identifier
    pub id: NotificationPreferenceId,
    /// Household this preference belongs to
    pub household_id: HouseholdId,
    /// Member these settings apply to
    pub member_id: MemberId,
    /// Remind about assigned chores coming due
    #[serde(default)]
    pub chore_reminders: bool,
    /// Alert when a reward becomes affordable
    #[serde(default)]
    pub reward_alerts: bool,
    /// Summary digest cadence
    #[serde(default)]
    pub digest: DigestCadence,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last write timestamp (Unix ms)
    pub modified: i64,
    /// Lifecycle state for sync
    #[serde(default)]
    pub state: Lifecycle,
}

impl NotificationPreference {
    /// Default settings for a member: reminders and alerts on, digest off
    #[must_use]
    pub fn new(household_id: HouseholdId, member_id: MemberId) -> Self {
        let now = now_ms();
        Self {
            id: NotificationPreferenceId::new(),
            household_id,
            member_id,
            chore_reminders: true,
            reward_alerts: true,
            digest: DigestCadence::Off,
            created_at: now,
            modified: now,
            state: Lifecycle::Active,
        }
    }
}

impl Record for NotificationPreference {
    const COLLECTION: Collection = Collection::NotificationPreference;

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
    fn defaults_enable_reminders_without_digest() {
        let preference = NotificationPreference::new(HouseholdId::new(), MemberId::new());
        assert!(preference.chore_reminders);
        assert!(preference.reward_alerts);
        assert_eq!(preference.digest, DigestCadence::Off);
    }
}
