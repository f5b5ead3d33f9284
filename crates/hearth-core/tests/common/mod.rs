//! In-memory fake remote service for exercising the sync engine.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use hearth_core::sync::{LiveFeed, RemoteEvent, RemoteService, WireRecord};
use hearth_core::{Collection, Error, Result};

const LIVE_EVENT_BUFFER: usize = 16;

#[derive(Default)]
struct RemoteState {
    tables: HashMap<Collection, BTreeMap<String, WireRecord>>,
    provisioned: Vec<Collection>,
    fail_push: bool,
    upsert_batches: Vec<(Collection, Vec<WireRecord>)>,
    delete_batches: Vec<(Collection, Vec<String>)>,
    live_senders: HashMap<Collection, mpsc::Sender<RemoteEvent>>,
}

/// Test double standing in for the hosted data service
#[derive(Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<RemoteState>>,
}

#[allow(dead_code)] // not every test file uses every helper
impl MemoryRemote {
    pub fn with_all_provisioned() -> Self {
        let remote = Self::default();
        for collection in Collection::ALL {
            remote.provision(collection);
        }
        remote
    }

    pub fn provision(&self, collection: Collection) {
        let mut state = self.state.lock().unwrap();
        if !state.provisioned.contains(&collection) {
            state.provisioned.push(collection);
        }
    }

    pub fn seed(&self, collection: Collection, record: WireRecord) {
        self.state
            .lock()
            .unwrap()
            .tables
            .entry(collection)
            .or_default()
            .insert(record.id.clone(), record);
    }

    pub fn set_fail_push(&self, fail: bool) {
        self.state.lock().unwrap().fail_push = fail;
    }

    /// Records currently held by the fake service
    pub fn stored(&self, collection: Collection) -> Vec<WireRecord> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(&collection)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn upsert_batches(&self, collection: Collection) -> Vec<Vec<WireRecord>> {
        self.state
            .lock()
            .unwrap()
            .upsert_batches
            .iter()
            .filter(|(tagged, _)| *tagged == collection)
            .map(|(_, batch)| batch.clone())
            .collect()
    }

    pub fn delete_batches(&self, collection: Collection) -> Vec<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .delete_batches
            .iter()
            .filter(|(tagged, _)| *tagged == collection)
            .map(|(_, batch)| batch.clone())
            .collect()
    }

    /// Deliver a live event to whoever subscribed to the collection
    pub async fn emit(&self, collection: Collection, event: RemoteEvent) {
        let sender = self
            .state
            .lock()
            .unwrap()
            .live_senders
            .get(&collection)
            .cloned();
        let sender = sender.expect("no live subscription for collection");
        sender.send(event).await.expect("live consumer went away");
    }
}

impl RemoteService for MemoryRemote {
    async fn pull_since(&self, collection: Collection, cursor: i64) -> Result<Vec<WireRecord>> {
        let state = self.state.lock().unwrap();
        if !state.provisioned.contains(&collection) {
            return Err(Error::SchemaNotProvisioned(collection));
        }

        let mut records: Vec<WireRecord> = state
            .tables
            .get(&collection)
            .map(|table| {
                table
                    .values()
                    .filter(|record| record.updated_at > cursor)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|record| record.updated_at);
        Ok(records)
    }

    async fn push_upserts(&self, collection: Collection, records: Vec<WireRecord>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_push {
            return Err(Error::Remote("injected push failure".to_string()));
        }
        if !state.provisioned.contains(&collection) {
            return Err(Error::SchemaNotProvisioned(collection));
        }

        let table = state.tables.entry(collection).or_default();
        for record in &records {
            table.insert(record.id.clone(), record.clone());
        }
        state.upsert_batches.push((collection, records));
        Ok(())
    }

    async fn push_deletes(&self, collection: Collection, ids: Vec<String>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_push {
            return Err(Error::Remote("injected push failure".to_string()));
        }
        if !state.provisioned.contains(&collection) {
            return Err(Error::SchemaNotProvisioned(collection));
        }

        if let Some(table) = state.tables.get_mut(&collection) {
            for id in &ids {
                table.remove(id);
            }
        }
        state.delete_batches.push((collection, ids));
        Ok(())
    }

    async fn subscribe(&self, collection: Collection) -> Result<LiveFeed> {
        let (sender, events) = mpsc::channel(LIVE_EVENT_BUFFER);
        self.state
            .lock()
            .unwrap()
            .live_senders
            .insert(collection, sender);
        Ok(LiveFeed { collection, events })
    }
}
