//! Sync conflict report model

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::resolver::ConflictSource;
use crate::util::now_ms;

/// Recorded sync conflict resolved by last-write-wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Conflict row identifier; zero until persisted
    pub id: i64,
    /// Collection the record belongs to
    pub collection: Collection,
    /// Record involved in the conflict
    pub record_id: String,
    /// Local copy's timestamp when the conflict occurred
    pub local_modified: i64,
    /// Incoming remote copy's timestamp
    pub remote_modified: i64,
    /// Which side's version won
    pub winner: ConflictSource,
    /// Resolution timestamp (Unix ms)
    pub resolved_at: i64,
}

impl ConflictReport {
    /// Build a report for a resolution that just happened
    #[must_use]
    pub fn new(
        collection: Collection,
        record_id: impl Into<String>,
        local_modified: i64,
        remote_modified: i64,
        winner: ConflictSource,
    ) -> Self {
        Self {
            id: 0,
            collection,
            record_id: record_id.into(),
            local_modified,
            remote_modified,
            winner,
            resolved_at: now_ms(),
        }
    }

    /// Absolute distance between the two conflicting timestamps
    #[must_use]
    pub const fn delta_ms(&self) -> i64 {
        (self.local_modified - self.remote_modified).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_symmetric() {
        let report = ConflictReport::new(Collection::Chore, "c1", 1_500, 1_200, ConflictSource::Local);
        assert_eq!(report.delta_ms(), 300);

        let flipped = ConflictReport::new(Collection::Chore, "c1", 1_200, 1_500, ConflictSource::Remote);
        assert_eq!(flipped.delta_ms(), 300);
    }
}
