//! Data models for Hearth

mod chore;
mod completion;
mod conflict;
mod household;
mod member;
mod notification;
mod points;
mod record;
mod reward;

pub use chore::{Chore, ChoreId};
pub use completion::{Completion, CompletionId, CompletionStatus};
pub use conflict::ConflictReport;
pub use household::{Household, HouseholdId};
pub use member::{Member, MemberId, MemberRole};
pub use notification::{DigestCadence, NotificationPreference, NotificationPreferenceId};
pub use points::{PointAdjustment, PointAdjustmentId};
pub use record::{Lifecycle, Record};
pub use reward::{Redemption, RedemptionId, Reward, RewardId};
