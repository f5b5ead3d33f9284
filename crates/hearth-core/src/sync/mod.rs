//! Remote sync engine for Hearth
//!
//! Per-collection pull/push/live reconciliation and the process-wide
//! orchestrator tying collections to connectivity state.

mod engine;
mod http;
mod orchestrator;
mod remote;

pub use engine::{CollectionSync, PushSummary};
pub use http::HttpRemote;
pub use orchestrator::SyncOrchestrator;
pub use remote::{from_wire, to_wire, LiveFeed, RemoteEvent, RemoteService, WireRecord};
