//! Last-write-wins conflict resolution.
//!
//! Resolution is a pure function of the two `modified` timestamps and field
//! contents. On an exact-timestamp tie the remote side's fields win layered
//! over the local ones; this is the documented convergence policy, so every
//! replica lands on the same record even under simultaneous writes with
//! coarse clock resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Record;

/// Which side produced the winning version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSource {
    Local,
    Remote,
    Merged,
}

impl ConflictSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for ConflictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "merged" => Ok(Self::Merged),
            other => Err(Error::InvalidInput(format!(
                "unknown conflict source: {other}"
            ))),
        }
    }
}

/// Outcome of resolving two conflicting copies of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<R> {
    pub winner: R,
    pub source: ConflictSource,
}

/// Determine the winning version between two copies of the same record.
///
/// Both copies must share an id; resolving across different ids is a
/// programming error and fails loudly.
pub fn resolve<R: Record>(local: &R, remote: &R) -> Result<Resolution<R>> {
    if local.id() != remote.id() {
        return Err(Error::IdentityMismatch {
            local: local.id(),
            remote: remote.id(),
        });
    }

    if local.modified() > remote.modified() {
        Ok(Resolution {
            winner: local.clone(),
            source: ConflictSource::Local,
        })
    } else if remote.modified() > local.modified() {
        Ok(Resolution {
            winner: remote.clone(),
            source: ConflictSource::Remote,
        })
    } else {
        Ok(Resolution {
            winner: merge(local, remote)?,
            source: ConflictSource::Merged,
        })
    }
}

/// Merge two same-timestamp copies: remote field values layered over local
/// ones, keeping the shared `modified` and the maximum of both sides'
/// activity field.
fn merge<R: Record>(local: &R, remote: &R) -> Result<R> {
    let mut base = serde_json::to_value(local)?;
    let overlay = serde_json::to_value(remote)?;

    if let (Value::Object(base_fields), Value::Object(overlay_fields)) = (&mut base, overlay) {
        for (key, value) in overlay_fields {
            if !value.is_null() {
                base_fields.insert(key, value);
            }
        }
    }

    let mut merged: R = serde_json::from_value(base)?;
    merged.set_modified(remote.modified());

    let activity = match (local.last_activity(), remote.last_activity()) {
        (Some(ours), Some(theirs)) => Some(ours.max(theirs)),
        (ours, theirs) => ours.or(theirs),
    };
    if let Some(timestamp) = activity {
        merged.set_last_activity(timestamp);
    }

    Ok(merged)
}

/// Reconcile a remote batch against the existing local set: union by id,
/// resolving each overlapping pair. Applying the same inputs twice yields
/// the same output.
pub fn merge_sets<R: Record>(local: Vec<R>, remote: Vec<R>) -> Result<Vec<R>> {
    let mut merged: BTreeMap<String, R> = local
        .into_iter()
        .map(|record| (record.id(), record))
        .collect();

    for incoming in remote {
        let key = incoming.id();
        match merged.remove(&key) {
            None => {
                merged.insert(key, incoming);
            }
            Some(existing) => {
                let resolution = resolve(&existing, &incoming)?;
                merged.insert(key, resolution.winner);
            }
        }
    }

    Ok(merged.into_values().collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Chore, Household, HouseholdId, Lifecycle};

    fn chore_pair() -> (Chore, Chore) {
        let local = Chore::new(HouseholdId::new(), "Dishes", 5);
        let remote = local.clone();
        (local, remote)
    }

    #[test]
    fn newer_remote_wins() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 100;
        remote.modified = 200;
        remote.title = "Dishes and counters".to_string();

        let resolution = resolve(&local, &remote).unwrap();
        assert_eq!(resolution.source, ConflictSource::Remote);
        assert_eq!(resolution.winner.modified, 200);
        assert_eq!(resolution.winner.title, "Dishes and counters");
    }

    #[test]
    fn newer_local_wins() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 900;
        local.points = 8;
        remote.modified = 400;

        let resolution = resolve(&local, &remote).unwrap();
        assert_eq!(resolution.source, ConflictSource::Local);
        assert_eq!(resolution.winner.modified, 900);
        assert_eq!(resolution.winner.points, 8);
    }

    #[test]
    fn tie_produces_merged_record_with_remote_fields() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 500;
        local.points = 3;
        remote.modified = 500;
        remote.title = "Deep clean".to_string();

        let resolution = resolve(&local, &remote).unwrap();
        assert_eq!(resolution.source, ConflictSource::Merged);
        assert_eq!(resolution.winner.modified, 500);
        assert_eq!(resolution.winner.title, "Deep clean");
    }

    #[test]
    fn tie_merge_keeps_local_value_where_remote_is_absent() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 500;
        local.due_at = Some(9_000);
        remote.modified = 500;
        remote.due_at = None;

        let resolution = resolve(&local, &remote).unwrap();
        assert_eq!(resolution.winner.due_at, Some(9_000));
    }

    #[test]
    fn tie_merge_maximizes_last_activity() {
        let mut local = Household::new("Maple Street");
        let mut remote = local.clone();
        local.modified = 700;
        local.last_activity_at = 650;
        remote.modified = 700;
        remote.last_activity_at = 600;

        let resolution = resolve(&local, &remote).unwrap();
        assert_eq!(resolution.source, ConflictSource::Merged);
        assert_eq!(resolution.winner.last_activity_at, 650);
    }

    #[test]
    fn resolution_is_deterministic() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 123;
        remote.modified = 456;

        let first = resolve(&local, &remote).unwrap();
        let second = resolve(&local, &remote).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn winner_carries_max_timestamp_when_sides_differ() {
        let (mut local, mut remote) = chore_pair();
        for (ours, theirs) in [(100, 200), (200, 100), (1, i64::MAX)] {
            local.modified = ours;
            remote.modified = theirs;
            let resolution = resolve(&local, &remote).unwrap();
            assert_eq!(resolution.winner.modified, ours.max(theirs));
        }
    }

    #[test]
    fn id_mismatch_fails_loudly() {
        let local = Chore::new(HouseholdId::new(), "Dishes", 5);
        let remote = Chore::new(HouseholdId::new(), "Dishes", 5);

        let error = resolve(&local, &remote).unwrap_err();
        assert!(matches!(error, Error::IdentityMismatch { .. }));
    }

    #[test]
    fn tombstone_participates_in_lww() {
        let (mut local, mut remote) = chore_pair();
        local.modified = 300;
        remote.modified = 400;
        remote.state = Lifecycle::Tombstoned;

        let resolution = resolve(&local, &remote).unwrap();
        assert!(resolution.winner.state.is_tombstoned());
    }

    #[test]
    fn merge_sets_is_a_union_by_id() {
        let household = HouseholdId::new();
        let mut shared_local = Chore::new(household, "Dishes", 5);
        let mut shared_remote = shared_local.clone();
        shared_local.modified = 100;
        shared_remote.modified = 200;

        let only_local = Chore::new(household, "Trash", 2);
        let only_remote = Chore::new(household, "Laundry", 7);

        let merged = merge_sets(
            vec![shared_local, only_local.clone()],
            vec![shared_remote.clone(), only_remote.clone()],
        )
        .unwrap();

        assert_eq!(merged.len(), 3);
        let shared = merged
            .iter()
            .find(|chore| chore.id == shared_remote.id)
            .unwrap();
        assert_eq!(shared.modified, 200);
        assert!(merged.iter().any(|chore| chore.id == only_local.id));
        assert!(merged.iter().any(|chore| chore.id == only_remote.id));
    }

    #[test]
    fn merge_sets_is_idempotent_for_unchanged_inputs() {
        let household = HouseholdId::new();
        let local = vec![Chore::new(household, "Dishes", 5)];
        let remote = vec![Chore::new(household, "Trash", 2)];

        let once = merge_sets(local.clone(), remote.clone()).unwrap();
        let twice = merge_sets(once.clone(), remote).unwrap();
        assert_eq!(once, twice);
    }
}
