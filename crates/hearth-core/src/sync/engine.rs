//! Per-collection sync engine: incremental pull, watermark-based push, and
//! live-event reconciliation.
//!
//! Pulled batches and live events go through the same last-write-wins
//! resolver, so a locally-dirty record is never blindly overwritten by a
//! stale remote copy. Watermarks advance only after a batch fully succeeds;
//! any failure leaves them untouched and the same records retry next cycle.

use crate::db::{ConflictLogRepository, Database, DocumentStore, SyncMetaRepository};
use crate::error::Result;
use crate::models::{ConflictReport, Lifecycle, Record};
use crate::resolver::{self, ConflictSource};
use crate::util::now_ms;

use super::remote::{from_wire, to_wire, RemoteEvent, RemoteService};

/// Outcome of one push cycle for a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    /// Records sent to the upsert endpoint
    pub upserted: usize,
    /// Tombstones sent to the delete endpoint
    pub deleted: usize,
    /// True when the remote table was not provisioned yet
    pub skipped: bool,
}

/// Sync driver for one collection against one remote service
pub struct CollectionSync<S: RemoteService> {
    store: DocumentStore,
    meta: SyncMetaRepository,
    conflicts: ConflictLogRepository,
    remote: S,
}

impl<S: RemoteService> CollectionSync<S> {
    #[must_use]
    pub fn new(db: Database, remote: S) -> Self {
        Self {
            store: DocumentStore::new(db.clone()),
            meta: SyncMetaRepository::new(db.clone()),
            conflicts: ConflictLogRepository::new(db),
            remote,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Pull remote changes since the collection's pull watermark and
    /// reconcile them into the local store.
    ///
    /// Returns the number of records applied. The watermark moves to the
    /// request time, not the newest record seen, so remote writes that land
    /// mid-flight are re-pulled on the next cycle.
    pub async fn pull<R: Record>(&self) -> Result<usize> {
        let meta = self.meta.get(R::COLLECTION).await?;
        let cursor_target = now_ms();

        let batch = match self.remote.pull_since(R::COLLECTION, meta.last_pull_ts).await {
            Ok(batch) => batch,
            Err(error) if error.is_schema_missing() => {
                tracing::debug!(
                    collection = %R::COLLECTION,
                    "Remote table not provisioned; skipping pull"
                );
                return Ok(0);
            }
            Err(error) => return Err(error),
        };

        let total = batch.len();
        let mut applied = 0usize;
        for wire in batch {
            match from_wire::<R>(wire) {
                Ok(incoming) => {
                    self.apply_incoming(incoming, "pull").await?;
                    applied += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        collection = %R::COLLECTION,
                        "Dropping malformed pulled record: {error}"
                    );
                }
            }
        }

        self.meta.advance_pull(R::COLLECTION, cursor_target).await?;
        tracing::debug!(collection = %R::COLLECTION, applied, total, "Pull complete");
        Ok(applied)
    }

    /// Push local changes since the collection's push watermark: active
    /// records to the upsert endpoint, tombstones to the delete endpoint.
    ///
    /// Tombstones stay in the local store after a successful push; physical
    /// removal is a separate, explicit hard delete.
    pub async fn push<R: Record>(&self) -> Result<PushSummary> {
        let meta = self.meta.get(R::COLLECTION).await?;
        let cursor_target = now_ms();

        let pending = self.store.modified_since::<R>(meta.last_push_ts).await?;
        if pending.is_empty() {
            return Ok(PushSummary::default());
        }

        let mut upserts = Vec::new();
        let mut deletes = Vec::new();
        for record in &pending {
            if record.lifecycle().is_tombstoned() {
                deletes.push(record.id());
            } else {
                upserts.push(to_wire(record)?);
            }
        }
        let summary = PushSummary {
            upserted: upserts.len(),
            deleted: deletes.len(),
            skipped: false,
        };

        let sent = async {
            self.remote.push_upserts(R::COLLECTION, upserts).await?;
            self.remote.push_deletes(R::COLLECTION, deletes).await
        }
        .await;

        match sent {
            Ok(()) => {
                self.meta.advance_push(R::COLLECTION, cursor_target).await?;
                tracing::debug!(
                    collection = %R::COLLECTION,
                    upserted = summary.upserted,
                    deleted = summary.deleted,
                    "Push complete"
                );
                Ok(summary)
            }
            Err(error) if error.is_schema_missing() => {
                tracing::debug!(
                    collection = %R::COLLECTION,
                    "Remote table not provisioned; retrying push next cycle"
                );
                Ok(PushSummary {
                    upserted: 0,
                    deleted: 0,
                    skipped: true,
                })
            }
            Err(error) => Err(error),
        }
    }

    /// Subscribe to the collection's live channel and reconcile events until
    /// the feed closes. Failures on individual events are logged, never
    /// fatal to the loop.
    pub async fn run_live<R: Record>(&self) -> Result<()> {
        let mut feed = self.remote.subscribe(R::COLLECTION).await?;
        tracing::debug!(collection = %R::COLLECTION, "Live subscription open");

        while let Some(event) = feed.events.recv().await {
            if let Err(error) = self.apply_event::<R>(event).await {
                tracing::error!(
                    collection = %R::COLLECTION,
                    "Failed to apply live event: {error}"
                );
            }
        }
        Ok(())
    }

    /// Reconcile one remote-originated event into the local store
    pub async fn apply_event<R: Record>(&self, event: RemoteEvent) -> Result<()> {
        match event {
            RemoteEvent::Upserted(wire) => {
                let incoming = from_wire::<R>(wire)?;
                self.apply_incoming(incoming, "live").await
            }
            RemoteEvent::Deleted { id, updated_at } => {
                let Some(mut local) = self.store.get_by_id::<R>(&id).await? else {
                    tracing::debug!(
                        collection = %R::COLLECTION,
                        id = %id,
                        "Delete event for unknown record; ignoring"
                    );
                    return Ok(());
                };

                // remote wins ties, same as the resolver
                if updated_at >= local.modified() {
                    local.set_lifecycle(Lifecycle::Tombstoned);
                    local.set_modified(updated_at);
                    self.store.apply_remote(&local).await
                } else {
                    let report = ConflictReport::new(
                        R::COLLECTION,
                        local.id(),
                        local.modified(),
                        updated_at,
                        ConflictSource::Local,
                    );
                    tracing::warn!(
                        collection = %R::COLLECTION,
                        id = %local.id(),
                        local_modified = local.modified(),
                        remote_modified = updated_at,
                        "Stale delete event lost to a fresher local edit"
                    );
                    self.conflicts.record(&report).await
                }
            }
        }
    }

    /// Look up the local copy and store whichever side wins resolution.
    /// Conflicts that don't trivially favor the remote side are logged and
    /// persisted for inspection.
    async fn apply_incoming<R: Record>(&self, incoming: R, origin: &'static str) -> Result<()> {
        let Some(local) = self.store.get_by_id::<R>(&incoming.id()).await? else {
            return self.store.apply_remote(&incoming).await;
        };

        let resolution = resolver::resolve(&local, &incoming)?;
        if resolution.source != ConflictSource::Remote {
            let report = ConflictReport::new(
                R::COLLECTION,
                local.id(),
                local.modified(),
                incoming.modified(),
                resolution.source,
            );
            tracing::warn!(
                collection = %R::COLLECTION,
                id = %local.id(),
                local_modified = local.modified(),
                remote_modified = incoming.modified(),
                source = %resolution.source,
                delta_ms = report.delta_ms(),
                origin,
                "Resolved concurrent edit"
            );
            self.conflicts.record(&report).await?;
        }

        self.store.apply_remote(&resolution.winner).await
    }

    /// Pull then push one collection; the standard sync cycle
    pub async fn cycle<R: Record>(&self) -> Result<(usize, PushSummary)> {
        let pulled = self.pull::<R>().await?;
        let pushed = self.push::<R>().await?;
        Ok((pulled, pushed))
    }
}
