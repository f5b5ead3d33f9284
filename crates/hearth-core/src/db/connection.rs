//! Database connection management

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

use super::migrations;

/// Handle to the persistent local store.
///
/// Cloning is cheap: every clone shares one SQLite connection behind a
/// mutex, so UI reads, CRUD writes, and sync pull/push all serialize
/// against the same store.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the store at the given path, creating it if it doesn't exist.
    ///
    /// Runs migrations automatically; re-opening an already-migrated store
    /// is a no-op beyond the version check.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|error| Error::Database(error.to_string()))?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|error| Error::Database(error.to_string()))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Release this handle. The underlying connection closes when the last
    /// clone is dropped; a closed store must be reopened before further use.
    pub fn close(self) {
        drop(self);
    }

    /// Irreversibly wipe the persisted store at the given path.
    pub fn destroy(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        for file in [
            path.to_path_buf(),
            path.with_file_name(format!("{}-wal", file_name(path))),
            path.with_file_name(format!("{}-shm", file_name(path))),
        ] {
            match std::fs::remove_file(&file) {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    /// Run a closure against the underlying connection.
    pub(crate) async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().await;
        f(&mut conn)
    }
}

/// Configure SQLite for local-first workloads
fn configure(conn: &Connection) -> Result<()> {
    // journal_mode returns the resulting mode as a row
    conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
        .ok();
    conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn open_in_memory_migrates() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert!(count > 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reopen_preserves_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hearth.db");

        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO sync_meta (collection, last_pull_ts, last_push_ts) VALUES ('chores', 42, 7)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let pull_ts: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT last_pull_ts FROM sync_meta WHERE collection = 'chores'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(pull_ts, 42);
    }

    #[test]
    fn destroy_removes_store_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hearth.db");

        {
            let _db = Database::open(&path).unwrap();
        }
        assert!(path.exists());

        Database::destroy(&path).unwrap();
        assert!(!path.exists());

        // destroying a missing store is not an error
        Database::destroy(&path).unwrap();
    }
}
