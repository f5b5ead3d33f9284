//! Orchestrator-level flows: startup, live updates, connectivity transitions.

mod common;

use std::time::Duration;

use common::MemoryRemote;
use hearth_core::db::{Database, DocumentStore};
use hearth_core::models::HouseholdId;
use hearth_core::sync::{to_wire, RemoteEvent, SyncOrchestrator};
use hearth_core::{Chore, Collection};
use tokio::time::sleep;

const SETTLE: Duration = Duration::from_millis(100);

#[tokio::test(flavor = "multi_thread")]
async fn start_all_pulls_pushes_and_opens_live_subscriptions() {
    let db = Database::open_in_memory().unwrap();
    let store = DocumentStore::new(db.clone());
    let remote = MemoryRemote::with_all_provisioned();

    // one record waiting on each side
    let mut incoming = Chore::new(HouseholdId::new(), "Dishes", 5);
    incoming.modified = 1_000;
    remote.seed(Collection::Chore, to_wire(&incoming).unwrap());
    let outgoing = store
        .insert(Chore::new(HouseholdId::new(), "Trash", 2))
        .await
        .unwrap();

    let orchestrator = SyncOrchestrator::new(db, Some(remote.clone()));
    orchestrator.start_all().await.unwrap();

    let pulled: Chore = store
        .get_by_id(&incoming.id.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pulled.title, "Dishes");
    assert!(remote
        .stored(Collection::Chore)
        .iter()
        .any(|record| record.id == outgoing.id.as_str()));

    let status = orchestrator.status().await.unwrap();
    assert!(status.last_sync_at.is_some());
    assert_eq!(status.collections.len(), Collection::ALL.len());
    assert!(status.collections.iter().all(|collection| collection.live));
    assert!(!status.syncing);

    // a live event lands in the store through the reconciliation loop
    sleep(SETTLE).await;
    let mut live = Chore::new(HouseholdId::new(), "Water plants", 3);
    live.modified = 2_000;
    remote
        .emit(
            Collection::Chore,
            RemoteEvent::Upserted(to_wire(&live).unwrap()),
        )
        .await;
    sleep(SETTLE).await;

    let applied: Chore = store.get_by_id(&live.id.as_str()).await.unwrap().unwrap();
    assert_eq!(applied.title, "Water plants");

    orchestrator.stop_all().await;
    sleep(SETTLE).await;
    let stopped = orchestrator.status().await.unwrap();
    assert!(stopped.collections.iter().all(|collection| !collection.live));

    // stop_all is idempotent
    orchestrator.stop_all().await;
    orchestrator.close_all().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_writes_push_after_reconnect() {
    let db = Database::open_in_memory().unwrap();
    let store = DocumentStore::new(db.clone());
    let remote = MemoryRemote::with_all_provisioned();
    let orchestrator = SyncOrchestrator::new(db, Some(remote.clone()));

    orchestrator.set_online(false).await;
    assert!(!orchestrator.is_online());

    // written while offline, durable locally
    let offline_chore = store
        .insert(Chore::new(HouseholdId::new(), "Fold laundry", 4))
        .await
        .unwrap();
    assert!(remote.stored(Collection::Chore).is_empty());

    orchestrator.set_online(true).await;

    assert!(remote
        .stored(Collection::Chore)
        .iter()
        .any(|record| record.id == offline_chore.id.as_str()));

    orchestrator.close_all().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn going_offline_only_flips_the_flag() {
    let db = Database::open_in_memory().unwrap();
    let remote = MemoryRemote::with_all_provisioned();
    let orchestrator = SyncOrchestrator::new(db, Some(remote.clone()));

    orchestrator.set_online(false).await;
    let status = orchestrator.status().await.unwrap();
    assert!(!status.online);
    // no sync ran
    assert!(status.last_sync_at.is_none());
    assert!(remote.upsert_batches(Collection::Chore).is_empty());

    orchestrator.close_all().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn without_a_remote_the_store_runs_local_only() {
    let db = Database::open_in_memory().unwrap();
    let store = DocumentStore::new(db.clone());
    let orchestrator: SyncOrchestrator<MemoryRemote> = SyncOrchestrator::new(db, None);

    assert!(orchestrator.is_local_only());
    orchestrator.start_all().await.unwrap();

    let chore = store
        .insert(Chore::new(HouseholdId::new(), "Dishes", 5))
        .await
        .unwrap();
    let fetched: Chore = store.get_by_id(&chore.id.as_str()).await.unwrap().unwrap();
    assert_eq!(fetched, chore);

    let status = orchestrator.status().await.unwrap();
    assert!(status.last_sync_at.is_none());
    assert!(status.collections.iter().all(|collection| !collection.live));

    orchestrator.close_all().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_start_all_replaces_subscriptions_instead_of_stacking() {
    let db = Database::open_in_memory().unwrap();
    let remote = MemoryRemote::with_all_provisioned();
    let orchestrator = SyncOrchestrator::new(db, Some(remote.clone()));

    orchestrator.start_all().await.unwrap();
    orchestrator.force_sync_all().await.unwrap();

    let status = orchestrator.status().await.unwrap();
    assert_eq!(status.collections.len(), Collection::ALL.len());
    assert!(status.collections.iter().all(|collection| collection.live));

    orchestrator.close_all().await;
}
