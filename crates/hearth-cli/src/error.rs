use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] hearth_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Record ID cannot be empty")]
    EmptyId,
    #[error("No household found. Run `hearth init <name> --admin <member>` first.")]
    NoHousehold,
    #[error("{0}")]
    AmbiguousHousehold(String),
    #[error("No record found for id/prefix: {0}")]
    RecordNotFound(String),
    #[error("{0}")]
    AmbiguousId(String),
    #[error("Reward is out of stock: {0}")]
    RewardUnavailable(String),
    #[error(
        "Sync is not configured. Set HEARTH_REMOTE_URL and HEARTH_API_KEY to enable `hearth sync`."
    )]
    SyncNotConfigured,
}
