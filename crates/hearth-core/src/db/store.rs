//! Generic CRUD operations over the local store.
//!
//! Every operation is uniform across collections: the record type's
//! `Collection` tag picks the table, and writes restamp `modified` so the
//! record is picked up by the next incremental push. The one exception is
//! `apply_remote`, which preserves the caller's timestamp and exists solely
//! for the sync engine to store resolver winners.

use rusqlite::params;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::models::{Lifecycle, Record};
use crate::util::now_ms;

use super::connection::Database;

/// Typed document operations shared by every collection
#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

struct RecordRow {
    id: String,
    household_id: Option<String>,
    payload: String,
    modified: i64,
    is_deleted: bool,
}

fn encode<R: Record>(doc: &R) -> Result<RecordRow> {
    Ok(RecordRow {
        id: doc.id(),
        household_id: doc.household(),
        payload: serde_json::to_string(doc)?,
        modified: doc.modified(),
        is_deleted: doc.lifecycle().is_tombstoned(),
    })
}

fn decode<R: Record>(payload: &str) -> Result<R> {
    serde_json::from_str(payload).map_err(|error| Error::Storage {
        collection: R::COLLECTION,
        message: error.to_string(),
    })
}

fn put_sql(collection: Collection) -> String {
    format!(
        "INSERT OR REPLACE INTO {} (id, household_id, payload, modified, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        collection.table()
    )
}

impl DocumentStore {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store a new record, stamping `modified` and defaulting `created_at`.
    ///
    /// Does not check for a pre-existing id; callers overwrite deliberately
    /// via `upsert`.
    pub async fn insert<R: Record>(&self, mut doc: R) -> Result<R> {
        let now = now_ms();
        doc.set_modified(now);
        if doc.created_at() == 0 {
            doc.set_created_at(now);
        }
        self.put(&doc).await?;
        Ok(doc)
    }

    /// Insert-or-replace, always restamping `modified` regardless of the
    /// caller-supplied value. A blind upsert of a stale in-memory copy wins
    /// locally, so conflicts must be resolved before calling this.
    pub async fn upsert<R: Record>(&self, mut doc: R) -> Result<R> {
        let now = now_ms();
        doc.set_modified(now);
        if doc.created_at() == 0 {
            doc.set_created_at(now);
        }
        self.put(&doc).await?;
        Ok(doc)
    }

    /// Upsert a batch in one transaction, stamping every document with the
    /// same call-time `modified`.
    pub async fn bulk_upsert<R: Record>(&self, docs: Vec<R>) -> Result<Vec<R>> {
        if docs.is_empty() {
            return Ok(docs);
        }

        let now = now_ms();
        let mut stamped = docs;
        for doc in &mut stamped {
            doc.set_modified(now);
            if doc.created_at() == 0 {
                doc.set_created_at(now);
            }
        }

        let rows = stamped.iter().map(encode).collect::<Result<Vec<_>>>()?;
        self.db
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(&put_sql(R::COLLECTION))?;
                    for row in &rows {
                        stmt.execute(params![
                            row.id,
                            row.household_id,
                            row.payload,
                            row.modified,
                            row.is_deleted
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;

        Ok(stamped)
    }

    /// Store a record exactly as given, preserving its `modified` stamp.
    ///
    /// Only the sync engine uses this, to store conflict-resolution winners
    /// whose timestamps come from the remote side.
    pub async fn apply_remote<R: Record>(&self, doc: &R) -> Result<()> {
        self.put(doc).await
    }

    /// Fetch one record by id. Tombstoned records are returned too; only
    /// active views filter them out.
    pub async fn get_by_id<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let id = id.to_string();
        self.db
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT payload FROM {} WHERE id = ?1",
                    R::COLLECTION.table()
                );
                match conn.query_row(&sql, params![id], |row| row.get::<_, String>(0)) {
                    Ok(payload) => Ok(Some(decode::<R>(&payload)?)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(error) => Err(error.into()),
                }
            })
            .await
    }

    /// All active records, newest first
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        self.db
            .with_conn(|conn| {
                let sql = format!(
                    "SELECT payload FROM {} WHERE is_deleted = 0 ORDER BY modified DESC",
                    R::COLLECTION.table()
                );
                let mut stmt = conn.prepare(&sql)?;
                let payloads = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                payloads.iter().map(|payload| decode(payload)).collect()
            })
            .await
    }

    /// Active records grouped under one household, newest first
    pub async fn find_by_household<R: Record>(&self, household_id: &str) -> Result<Vec<R>> {
        let household_id = household_id.to_string();
        self.db
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT payload FROM {} WHERE household_id = ?1 AND is_deleted = 0
                     ORDER BY modified DESC",
                    R::COLLECTION.table()
                );
                let mut stmt = conn.prepare(&sql)?;
                let payloads = stmt
                    .query_map(params![household_id], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                payloads.iter().map(|payload| decode(payload)).collect()
            })
            .await
    }

    /// Client-side filter over the active records of one collection.
    ///
    /// Fine for the kilobyte-scale cache this store targets; not meant for
    /// large datasets.
    pub async fn query<R, F>(&self, predicate: F) -> Result<Vec<R>>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        let all = self.get_all::<R>().await?;
        Ok(all.into_iter().filter(|record| predicate(record)).collect())
    }

    /// Number of active records
    pub async fn count<R: Record>(&self) -> Result<usize> {
        self.db
            .with_conn(|conn| {
                let sql = format!(
                    "SELECT COUNT(*) FROM {} WHERE is_deleted = 0",
                    R::COLLECTION.table()
                );
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(usize::try_from(count).unwrap_or(0))
            })
            .await
    }

    /// All records (tombstones included) whose `modified` is strictly
    /// greater than the given watermark, ascending. This feeds incremental
    /// push.
    pub async fn modified_since<R: Record>(&self, since: i64) -> Result<Vec<R>> {
        self.db
            .with_conn(move |conn| {
                let sql = format!(
                    "SELECT payload FROM {} WHERE modified > ?1 ORDER BY modified ASC",
                    R::COLLECTION.table()
                );
                let mut stmt = conn.prepare(&sql)?;
                let payloads = stmt
                    .query_map(params![since], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                payloads.iter().map(|payload| decode(payload)).collect()
            })
            .await
    }

    /// Delete a record. Soft deletion (the default used for sync) writes a
    /// restamped tombstone so the deletion propagates; hard deletion removes
    /// the row physically.
    pub async fn remove<R: Record>(&self, id: &str, hard: bool) -> Result<()> {
        if hard {
            let id = id.to_string();
            return self
                .db
                .with_conn(move |conn| {
                    let sql = format!("DELETE FROM {} WHERE id = ?1", R::COLLECTION.table());
                    let rows = conn.execute(&sql, params![id.clone()])?;
                    if rows == 0 {
                        return Err(Error::NotFound(id));
                    }
                    Ok(())
                })
                .await;
        }

        let Some(mut doc) = self.get_by_id::<R>(id).await? else {
            return Err(Error::NotFound(id.to_string()));
        };
        doc.set_lifecycle(Lifecycle::Tombstoned);
        doc.set_modified(now_ms());
        self.put(&doc).await
    }

    async fn put<R: Record>(&self, doc: &R) -> Result<()> {
        let row = encode(doc)?;
        self.db
            .with_conn(move |conn| {
                conn.execute(
                    &put_sql(R::COLLECTION),
                    params![
                        row.id,
                        row.household_id,
                        row.payload,
                        row.modified,
                        row.is_deleted
                    ],
                )?;
                Ok(())
            })
            .await
    }
}
