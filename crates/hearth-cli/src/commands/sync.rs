use std::path::Path;

use hearth_core::db::{ConflictLogRepository, SyncMetaRepository};
use hearth_core::models::ConflictReport;
use hearth_core::sync::{HttpRemote, SyncOrchestrator};
use hearth_core::Collection;
use serde::Serialize;

use crate::commands::common::{open_database, remote_config_from_env, short_id};
use crate::error::CliError;

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let Some(config) = remote_config_from_env() else {
        return Err(CliError::SyncNotConfigured);
    };

    tracing::info!("Syncing with configured remote service");
    let db = open_database(db_path)?;
    let remote = HttpRemote::new(&config)?;
    let orchestrator = SyncOrchestrator::new(db, Some(remote));

    orchestrator.force_sync_all().await?;
    orchestrator.close_all().await;

    println!("Sync completed");
    Ok(())
}

#[derive(Debug, Serialize)]
struct CollectionStatusItem {
    collection: String,
    last_pull_ts: i64,
    last_push_ts: i64,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    remote_configured: bool,
    collections: Vec<CollectionStatusItem>,
}

pub async fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let meta = SyncMetaRepository::new(db);
    let remote_configured = remote_config_from_env().is_some();

    let mut collections = Vec::with_capacity(Collection::ALL.len());
    for collection in Collection::ALL {
        let watermarks = meta.get(collection).await?;
        collections.push(CollectionStatusItem {
            collection: collection.table().to_string(),
            last_pull_ts: watermarks.last_pull_ts,
            last_push_ts: watermarks.last_push_ts,
        });
    }

    if as_json {
        let report = StatusReport {
            remote_configured,
            collections,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Mode: {}",
        if remote_configured {
            "synced"
        } else {
            "local-only"
        }
    );
    for item in &collections {
        println!(
            "{:<26}  pull {:>13}  push {:>13}",
            item.collection, item.last_pull_ts, item.last_push_ts
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConflictItem {
    id: i64,
    collection: String,
    record_id: String,
    local_modified: i64,
    remote_modified: i64,
    winner: String,
    resolved_at: i64,
}

fn conflict_to_item(report: &ConflictReport) -> ConflictItem {
    ConflictItem {
        id: report.id,
        collection: report.collection.table().to_string(),
        record_id: report.record_id.clone(),
        local_modified: report.local_modified,
        remote_modified: report.remote_modified,
        winner: report.winner.as_str().to_string(),
        resolved_at: report.resolved_at,
    }
}

pub async fn run_conflicts(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let conflicts = ConflictLogRepository::new(db).recent(limit).await?;

    if as_json {
        let items = conflicts.iter().map(conflict_to_item).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No sync conflicts recorded.");
        return Ok(());
    }

    for conflict in &conflicts {
        println!(
            "{:<26}  {:<13}  local {:>13}  remote {:>13}  winner {:<6}  delta {}ms",
            conflict.collection.table(),
            short_id(&conflict.record_id),
            conflict.local_modified,
            conflict.remote_modified,
            conflict.winner.as_str(),
            conflict.delta_ms()
        );
    }
    Ok(())
}
