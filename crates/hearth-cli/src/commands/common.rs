use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use hearth_core::config::RemoteConfig;
use hearth_core::db::{Database, DocumentStore};
use hearth_core::models::Household;
use hearth_core::Record;

use crate::error::CliError;

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("HEARTH_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearth")
        .join("hearth.db")
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(path)?)
}

pub fn open_store(path: &Path) -> Result<DocumentStore, CliError> {
    Ok(DocumentStore::new(open_database(path)?))
}

/// Remote settings from the environment; `None` means local-only mode
pub fn remote_config_from_env() -> Option<RemoteConfig> {
    let url = env::var("HEARTH_REMOTE_URL").ok()?;
    let api_key = env::var("HEARTH_API_KEY").ok()?;

    let config = RemoteConfig::new(url, api_key);
    config.is_configured().then_some(config)
}

/// Pick the household to operate on: an explicit id/prefix, or the only
/// household in the local store.
pub async fn resolve_household(
    store: &DocumentStore,
    explicit: Option<&str>,
) -> Result<Household, CliError> {
    if let Some(query) = explicit {
        return resolve_by_prefix::<Household>(store, query).await;
    }

    let mut households: Vec<Household> = store.get_all().await?;
    match households.len() {
        0 => Err(CliError::NoHousehold),
        1 => Ok(households.remove(0)),
        _ => {
            let options = households
                .iter()
                .map(|household| format!("{} ({})", short_id(&household.id.as_str()), household.name))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousHousehold(format!(
                "Several households exist; pass --household. Options: {options}"
            )))
        }
    }
}

/// Resolve a record by exact id or unique id prefix
pub async fn resolve_by_prefix<R: Record>(
    store: &DocumentStore,
    query: &str,
) -> Result<R, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::EmptyId);
    }

    let mut matches: Vec<R> = store
        .query(|record: &R| record.id().starts_with(query))
        .await?;

    if matches.len() > 1 {
        let options = matches
            .iter()
            .take(3)
            .map(|record| short_id(&record.id()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::AmbiguousId(format!(
            "ID prefix '{query}' is ambiguous; matches: {options}"
        )));
    }

    matches
        .pop()
        .ok_or_else(|| CliError::RecordNotFound(query.to_string()))
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn normalize_title(title: &str) -> Result<String, CliError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
