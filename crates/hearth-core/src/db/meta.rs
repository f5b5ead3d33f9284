//! Per-collection sync watermark repository.
//!
//! Watermarks bound which remote/local changes have already been reconciled.
//! They advance only after a fully-committed pull or push batch and never
//! roll back; the `MAX()` guard at write time enforces monotonicity even if
//! a caller hands in an older timestamp.

use rusqlite::params;

use crate::collection::Collection;
use crate::error::Result;

use super::connection::Database;

/// Watermarks for one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMeta {
    /// Remote changes up to this stamp have been pulled
    pub last_pull_ts: i64,
    /// Local changes up to this stamp have been pushed
    pub last_push_ts: i64,
}

/// Store for per-collection sync watermarks
#[derive(Clone)]
pub struct SyncMetaRepository {
    db: Database,
}

impl SyncMetaRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Watermarks for a collection; zeros when the collection has never
    /// synced.
    pub async fn get(&self, collection: Collection) -> Result<SyncMeta> {
        self.db
            .with_conn(move |conn| {
                match conn.query_row(
                    "SELECT last_pull_ts, last_push_ts FROM sync_meta WHERE collection = ?1",
                    params![collection.table()],
                    |row| {
                        Ok(SyncMeta {
                            last_pull_ts: row.get(0)?,
                            last_push_ts: row.get(1)?,
                        })
                    },
                ) {
                    Ok(meta) => Ok(meta),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(SyncMeta::default()),
                    Err(error) => Err(error.into()),
                }
            })
            .await
    }

    /// Advance the pull watermark, never backward
    pub async fn advance_pull(&self, collection: Collection, timestamp: i64) -> Result<()> {
        self.db
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO sync_meta (collection, last_pull_ts, last_push_ts)
                     VALUES (?1, ?2, 0)
                     ON CONFLICT(collection)
                     DO UPDATE SET last_pull_ts = MAX(last_pull_ts, excluded.last_pull_ts)",
                    params![collection.table(), timestamp],
                )?;
                Ok(())
            })
            .await
    }

    /// Advance the push watermark, never backward
    pub async fn advance_push(&self, collection: Collection, timestamp: i64) -> Result<()> {
        self.db
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO sync_meta (collection, last_pull_ts, last_push_ts)
                     VALUES (?1, 0, ?2)
                     ON CONFLICT(collection)
                     DO UPDATE SET last_push_ts = MAX(last_push_ts, excluded.last_push_ts)",
                    params![collection.table(), timestamp],
                )?;
                Ok(())
            })
            .await
    }
}
