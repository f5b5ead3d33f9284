//! Error types for hearth-core

use thiserror::Error;

use crate::collection::Collection;

/// Result type alias using hearth-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hearth-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local store failed to open or is unusable
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Read or write failed for a specific collection
    #[error("Storage error in {collection}: {message}")]
    Storage {
        collection: Collection,
        message: String,
    },

    /// Network or remote-service failure; retried on the next sync cycle
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Remote table does not exist yet; expected on partially-deployed backends
    #[error("Remote table for {0} is not provisioned")]
    SchemaNotProvisioned(Collection),

    /// Conflict resolution was attempted across two different record ids
    #[error("Cannot resolve a conflict across ids: local {local}, remote {remote}")]
    IdentityMismatch { local: String, remote: String },
}

impl Error {
    /// Recoverable failures leave sync watermarks untouched and are retried
    /// on the next cycle or reconnect.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Missing remote tables are skipped without alarm.
    #[must_use]
    pub const fn is_schema_missing(&self) -> bool {
        matches!(self, Self::SchemaNotProvisioned(_))
    }
}
