//! Process-wide sync coordination across all collections.
//!
//! The orchestrator is an explicitly owned object injected where needed, so
//! independent sessions (tests, multiple profiles) never share global state.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::collection::Collection;
use crate::db::{Database, SyncMetaRepository};
use crate::error::Result;
use crate::models::{
    Chore, Completion, Household, Member, NotificationPreference, PointAdjustment, Record,
    Redemption, Reward,
};
use crate::state::{CollectionStatus, SyncStatus};
use crate::util::now_ms;

use super::engine::CollectionSync;
use super::remote::RemoteService;

/// Lifecycle coordinator for sync across every collection.
///
/// Holds the online flag, the syncing-in-flight guard, and the live
/// subscription handles. Without a remote it degrades to local-only mode:
/// every store operation keeps working, sync calls are no-ops.
pub struct SyncOrchestrator<S: RemoteService> {
    db: Database,
    remote: Option<S>,
    online: AtomicBool,
    syncing: AtomicBool,
    last_sync_at: AtomicI64,
    live_tasks: Mutex<Vec<(Collection, JoinHandle<()>)>>,
}

impl<S: RemoteService> SyncOrchestrator<S> {
    #[must_use]
    pub fn new(db: Database, remote: Option<S>) -> Self {
        Self {
            db,
            remote,
            online: AtomicBool::new(true),
            syncing: AtomicBool::new(false),
            last_sync_at: AtomicI64::new(0),
            live_tasks: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.remote.is_none()
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Initial pull, push of pending changes, then a live subscription for
    /// every collection. Collections run independently and in parallel; one
    /// collection failing to start does not block the others.
    ///
    /// Re-running replaces existing subscriptions.
    pub async fn start_all(&self) -> Result<()> {
        let Some(remote) = self.remote.clone() else {
            tracing::info!("No remote configured; store runs local-only");
            return Ok(());
        };

        // Not a true mutex: overlapping calls racing past this check are a
        // known limitation.
        if !self.begin_sync() {
            tracing::debug!("Sync already in flight; skipping");
            return Ok(());
        }

        self.teardown_live().await;

        let mut cycles = Vec::new();
        for collection in Collection::ALL {
            let engine = CollectionSync::new(self.db.clone(), remote.clone());
            cycles.push(tokio::spawn(async move {
                if let Err(error) = cycle_collection(&engine, collection).await {
                    tracing::error!(%collection, "Sync cycle failed: {error}");
                }
            }));
        }
        for cycle in cycles {
            let _ = cycle.await;
        }

        let mut tasks = self.live_tasks.lock().await;
        for collection in Collection::ALL {
            let engine = CollectionSync::new(self.db.clone(), remote.clone());
            tasks.push((collection, tokio::spawn(live_collection(engine, collection))));
        }
        drop(tasks);

        self.last_sync_at.store(now_ms(), Ordering::SeqCst);
        self.finish_sync();
        Ok(())
    }

    /// Tear down every live subscription; idempotent
    pub async fn stop_all(&self) {
        self.teardown_live().await;
    }

    /// Re-run the full startup sequence, guarded against overlapping runs
    pub async fn force_sync_all(&self) -> Result<()> {
        self.start_all().await
    }

    /// Stop subscriptions and release the store handle together
    pub async fn close_all(self) {
        self.stop_all().await;
        drop(self);
    }

    /// Record a connectivity transition. Going online triggers a forced
    /// full sync; going offline only flips the flag — in-flight requests
    /// are left to fail naturally and retry later.
    pub async fn set_online(&self, online: bool) {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            tracing::info!("Connectivity restored; forcing full sync");
            if let Err(error) = self.force_sync_all().await {
                tracing::error!("Forced sync after reconnect failed: {error}");
            }
        }
    }

    /// Queryable snapshot of sync state
    pub async fn status(&self) -> Result<SyncStatus> {
        let meta = SyncMetaRepository::new(self.db.clone());
        let tasks = self.live_tasks.lock().await;

        let mut collections = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            let watermarks = meta.get(collection).await?;
            let live = tasks
                .iter()
                .any(|(tagged, handle)| *tagged == collection && !handle.is_finished());
            collections.push(CollectionStatus {
                collection,
                live,
                last_pull_ts: watermarks.last_pull_ts,
                last_push_ts: watermarks.last_push_ts,
            });
        }

        let last_sync_at = self.last_sync_at.load(Ordering::SeqCst);
        Ok(SyncStatus {
            online: self.is_online(),
            syncing: self.is_syncing(),
            last_sync_at: (last_sync_at > 0).then_some(last_sync_at),
            collections,
        })
    }

    fn begin_sync(&self) -> bool {
        self.syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn finish_sync(&self) {
        self.syncing.store(false, Ordering::SeqCst);
    }

    async fn teardown_live(&self) {
        let mut tasks = self.live_tasks.lock().await;
        for (_, handle) in tasks.drain(..) {
            handle.abort();
        }
    }
}

/// Resolve a collection tag to its strongly-typed engine calls. The match
/// is the whole registry; adding a collection fails to compile until it is
/// routed here.
async fn cycle_collection<S: RemoteService>(
    engine: &CollectionSync<S>,
    collection: Collection,
) -> Result<()> {
    match collection {
        Collection::Household => run_cycle::<Household, S>(engine).await,
        Collection::Member => run_cycle::<Member, S>(engine).await,
        Collection::Chore => run_cycle::<Chore, S>(engine).await,
        Collection::Completion => run_cycle::<Completion, S>(engine).await,
        Collection::Reward => run_cycle::<Reward, S>(engine).await,
        Collection::Redemption => run_cycle::<Redemption, S>(engine).await,
        Collection::PointAdjustment => run_cycle::<PointAdjustment, S>(engine).await,
        Collection::NotificationPreference => {
            run_cycle::<NotificationPreference, S>(engine).await
        }
    }
}

async fn run_cycle<R: Record, S: RemoteService>(engine: &CollectionSync<S>) -> Result<()> {
    let (pulled, pushed) = engine.cycle::<R>().await?;
    tracing::debug!(
        collection = %R::COLLECTION,
        pulled,
        upserted = pushed.upserted,
        deleted = pushed.deleted,
        "Cycle complete"
    );
    Ok(())
}

async fn live_collection<S: RemoteService>(engine: CollectionSync<S>, collection: Collection) {
    let result = match collection {
        Collection::Household => engine.run_live::<Household>().await,
        Collection::Member => engine.run_live::<Member>().await,
        Collection::Chore => engine.run_live::<Chore>().await,
        Collection::Completion => engine.run_live::<Completion>().await,
        Collection::Reward => engine.run_live::<Reward>().await,
        Collection::Redemption => engine.run_live::<Redemption>().await,
        Collection::PointAdjustment => engine.run_live::<PointAdjustment>().await,
        Collection::NotificationPreference => {
            engine.run_live::<NotificationPreference>().await
        }
    };

    if let Err(error) = result {
        tracing::warn!(%collection, "Live subscription ended: {error}");
    }
}
