//! Shared sync state types.

use crate::collection::Collection;

/// Unified sync state used by every client surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Offline,
    Syncing,
    Synced,
    Error,
}

/// Per-collection view in a status snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionStatus {
    pub collection: Collection,
    /// Whether a live subscription loop is currently running
    pub live: bool,
    pub last_pull_ts: i64,
    pub last_push_ts: i64,
}

/// Queryable snapshot of the orchestrator's state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncStatus {
    pub online: bool,
    pub syncing: bool,
    /// Completion time of the last full sync (Unix ms), if any
    pub last_sync_at: Option<i64>,
    pub collections: Vec<CollectionStatus>,
}

impl SyncStatus {
    /// Condensed state for UI display
    #[must_use]
    pub fn state(&self) -> SyncState {
        if !self.online {
            SyncState::Offline
        } else if self.syncing {
            SyncState::Syncing
        } else {
            SyncState::Synced
        }
    }
}
