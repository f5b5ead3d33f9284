//! Persisted log of resolved sync conflicts.

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use std::str::FromStr;

use rusqlite::params;

use crate::collection::Collection;
use crate::error::Result;
use crate::models::ConflictReport;
use crate::resolver::ConflictSource;

use super::connection::Database;

/// Store for conflict reports written by the sync engine
#[derive(Clone)]
pub struct ConflictLogRepository {
    db: Database,
}

impl ConflictLogRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append a resolved conflict to the log
    pub async fn record(&self, report: &ConflictReport) -> Result<()> {
        let report = report.clone();
        self.db
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO sync_conflicts
                     (collection, record_id, local_modified, remote_modified, winner, resolved_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        report.collection.table(),
                        report.record_id,
                        report.local_modified,
                        report.remote_modified,
                        report.winner.as_str(),
                        report.resolved_at
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Most recently resolved conflicts, newest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<ConflictReport>> {
        let rows = self
            .db
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, collection, record_id, local_modified, remote_modified,
                            winner, resolved_at
                     FROM sync_conflicts
                     ORDER BY resolved_at DESC
                     LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(params![limit as i64], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, i64>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, i64>(6)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(
                |(id, collection, record_id, local_modified, remote_modified, winner, resolved_at)| {
                    Ok(ConflictReport {
                        id,
                        collection: Collection::from_str(&collection)?,
                        record_id,
                        local_modified,
                        remote_modified,
                        winner: ConflictSource::from_str(&winner)?,
                        resolved_at,
                    })
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConflictLogRepository {
        ConflictLogRepository::new(Database::open_in_memory().unwrap())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn recorded_conflicts_read_back_newest_first() {
        let repo = setup();

        let older = ConflictReport {
            id: 0,
            collection: Collection::Chore,
            record_id: "c1".to_string(),
            local_modified: 100,
            remote_modified: 200,
            winner: ConflictSource::Remote,
            resolved_at: 1_000,
        };
        let newer = ConflictReport {
            id: 0,
            collection: Collection::Reward,
            record_id: "r1".to_string(),
            local_modified: 500,
            remote_modified: 400,
            winner: ConflictSource::Local,
            resolved_at: 2_000,
        };

        repo.record(&older).await.unwrap();
        repo.record(&newer).await.unwrap();

        let recent = repo.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record_id, "r1");
        assert_eq!(recent[0].winner, ConflictSource::Local);
        assert_eq!(recent[1].collection, Collection::Chore);
        assert!(recent[0].id > 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn recent_respects_limit() {
        let repo = setup();
        for n in 0..5 {
            let report = ConflictReport {
                id: 0,
                collection: Collection::Chore,
                record_id: format!("c{n}"),
                local_modified: n,
                remote_modified: n + 1,
                winner: ConflictSource::Remote,
                resolved_at: n,
            };
            repo.record(&report).await.unwrap();
        }

        assert_eq!(repo.recent(3).await.unwrap().len(), 3);
    }
}
