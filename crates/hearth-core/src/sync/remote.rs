//! Remote data service boundary.
//!
//! The remote side is a black box reached through `RemoteService`: cursor
//! pulls, batched upserts and deletes, and a push-based live event channel
//! per collection. Wire records differ from local ones only by naming: the
//! server's change-tracking column `updated_at` is the local `modified`
//! field, and the lifecycle state travels as the `is_deleted` boolean.
//! Translation is a pure renaming step, no value transformation.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::models::{Lifecycle, Record};

/// Wire representation of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub id: String,
    /// Server-side change-tracking stamp (Unix ms); local name: `modified`
    pub updated_at: i64,
    #[serde(default)]
    pub is_deleted: bool,
    /// Domain fields, untouched by translation
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Remote-originated change delivered over the live channel
#[derive(Debug, Clone)]
pub enum RemoteEvent {
    Upserted(WireRecord),
    Deleted { id: String, updated_at: i64 },
}

/// Live update feed for one collection.
///
/// Events arrive on a bounded channel consumed by a single reconciliation
/// loop; producers that outpace the consumer block at the channel, which
/// makes backpressure explicit.
pub struct LiveFeed {
    pub collection: Collection,
    pub events: mpsc::Receiver<RemoteEvent>,
}

/// Per-collection operations the remote data service must support
pub trait RemoteService: Clone + Send + Sync + 'static {
    /// Records with `updated_at` strictly greater than the cursor, ascending
    fn pull_since(
        &self,
        collection: Collection,
        cursor: i64,
    ) -> impl Future<Output = Result<Vec<WireRecord>>> + Send;

    /// Upsert a batch of records
    fn push_upserts(
        &self,
        collection: Collection,
        records: Vec<WireRecord>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete records by id
    fn push_deletes(
        &self,
        collection: Collection,
        ids: Vec<String>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Open the live update channel for a collection
    fn subscribe(&self, collection: Collection) -> impl Future<Output = Result<LiveFeed>> + Send;
}

/// Translate a local record to its wire form
pub fn to_wire<R: Record>(record: &R) -> Result<WireRecord> {
    let value = serde_json::to_value(record)?;
    let Value::Object(mut fields) = value else {
        return Err(Error::InvalidInput(
            "record did not serialize to an object".to_string(),
        ));
    };

    let id = match fields.remove("id") {
        Some(Value::String(id)) => id,
        _ => {
            return Err(Error::InvalidInput(
                "record is missing a string id".to_string(),
            ))
        }
    };
    let updated_at = fields
        .remove("modified")
        .and_then(|value| value.as_i64())
        .ok_or_else(|| Error::InvalidInput("record is missing a modified stamp".to_string()))?;
    let is_deleted = matches!(
        fields.remove("state"),
        Some(Value::String(state)) if state == "tombstoned"
    );

    Ok(WireRecord {
        id,
        updated_at,
        is_deleted,
        fields,
    })
}

/// Translate a wire record back to its local form
pub fn from_wire<R: Record>(wire: WireRecord) -> Result<R> {
    let WireRecord {
        id,
        updated_at,
        is_deleted,
        mut fields,
    } = wire;

    fields.insert("id".to_string(), Value::String(id));
    fields.insert("modified".to_string(), Value::from(updated_at));
    let state = if is_deleted {
        Lifecycle::Tombstoned
    } else {
        Lifecycle::Active
    };
    fields.insert("state".to_string(), serde_json::to_value(state)?);

    serde_json::from_value(Value::Object(fields)).map_err(|error| Error::Storage {
        collection: R::COLLECTION,
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Chore, HouseholdId};

    #[test]
    fn to_wire_renames_tracking_fields() {
        let mut chore = Chore::new(HouseholdId::new(), "Dishes", 5);
        chore.modified = 777;
        chore.state = Lifecycle::Tombstoned;

        let wire = to_wire(&chore).unwrap();
        assert_eq!(wire.id, chore.id.as_str());
        assert_eq!(wire.updated_at, 777);
        assert!(wire.is_deleted);
        assert!(!wire.fields.contains_key("modified"));
        assert!(!wire.fields.contains_key("state"));
        assert_eq!(wire.fields["title"], "Dishes");
    }

    #[test]
    fn from_wire_restores_the_record() {
        let chore = Chore::new(HouseholdId::new(), "Dishes", 5);
        let wire = to_wire(&chore).unwrap();

        let restored: Chore = from_wire(wire).unwrap();
        assert_eq!(restored, chore);
    }

    #[test]
    fn from_wire_rejects_foreign_shapes() {
        let wire = WireRecord {
            id: "not-a-uuid".to_string(),
            updated_at: 1,
            is_deleted: false,
            fields: Map::new(),
        };

        let error = from_wire::<Chore>(wire).unwrap_err();
        assert!(matches!(error, Error::Storage { .. }));
    }
}
