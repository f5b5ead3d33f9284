//! Database migrations
//!
//! Schema upgrades are versioned and additive: new collections and indexes
//! arrive in later versions without rewriting existing records, and each
//! migration is guarded by the stored schema version so interrupted runs
//! are safe to repeat.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version
const CURRENT_VERSION: i32 = 3;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }
    if version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get::<_, i32>(0),
    )? != 0;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn apply_batch(conn: &Connection, sql: &str) -> Result<()> {
    if let Err(error) = conn.execute_batch(sql) {
        let _ = conn.execute_batch("ROLLBACK");
        return Err(error.into());
    }
    Ok(())
}

/// One uniform table per replicated collection: the payload column holds the
/// full record as JSON; id, household_id, modified, and is_deleted are
/// extracted for indexing. household_id is the cross-collection grouping
/// key and is NULL for households themselves.
fn collection_table(name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {name} (
            id TEXT PRIMARY KEY,
            household_id TEXT,
            payload TEXT NOT NULL,
            modified INTEGER NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_{name}_modified ON {name}(modified ASC);
        CREATE INDEX IF NOT EXISTS idx_{name}_household ON {name}(household_id);
        CREATE INDEX IF NOT EXISTS idx_{name}_deleted ON {name}(is_deleted);"
    )
}

/// Migration to version 1: initial collections and sync metadata
fn migrate_v1(conn: &Connection) -> Result<()> {
    let mut script = String::from(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY
         );",
    );

    for table in [
        "households",
        "members",
        "chores",
        "completions",
        "rewards",
        "redemptions",
        "point_adjustments",
    ] {
        script.push_str(&collection_table(table));
    }

    script.push_str(
        "CREATE TABLE IF NOT EXISTS sync_meta (
             collection TEXT PRIMARY KEY,
             last_pull_ts INTEGER NOT NULL DEFAULT 0,
             last_push_ts INTEGER NOT NULL DEFAULT 0
         );
         INSERT INTO schema_version (version) VALUES (1);
         COMMIT;",
    );

    apply_batch(conn, &script)?;
    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: LWW conflict logging support
fn migrate_v2(conn: &Connection) -> Result<()> {
    apply_batch(
        conn,
        "BEGIN;
         CREATE TABLE IF NOT EXISTS sync_conflicts (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             collection TEXT NOT NULL,
             record_id TEXT NOT NULL,
             local_modified INTEGER NOT NULL,
             remote_modified INTEGER NOT NULL,
             winner TEXT NOT NULL,
             resolved_at INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_sync_conflicts_record ON sync_conflicts(record_id);
         CREATE INDEX IF NOT EXISTS idx_sync_conflicts_resolved_at ON sync_conflicts(resolved_at DESC);
         INSERT INTO schema_version (version) VALUES (2);
         COMMIT;",
    )?;
    tracing::info!("Migrated database to version 2");
    Ok(())
}

/// Migration to version 3: notification preferences collection and a
/// completions-by-chore lookup index
fn migrate_v3(conn: &Connection) -> Result<()> {
    let mut script = String::from("BEGIN;");
    script.push_str(&collection_table("notification_preferences"));
    script.push_str(
        "CREATE INDEX IF NOT EXISTS idx_completions_chore
             ON completions(json_extract(payload, '$.chore_id'));
         INSERT INTO schema_version (version) VALUES (3);
         COMMIT;",
    );

    apply_batch(conn, &script)?;
    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn migrations_reach_current_version() {
        let conn = setup();
        run(&conn).unwrap();

        let version = get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = setup();
        run(&conn).unwrap();
        run(&conn).unwrap(); // Should not fail

        let version = get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn every_collection_table_exists() {
        let conn = setup();
        run(&conn).unwrap();

        for table in crate::collection::Collection::ALL {
            let exists: i32 = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                    [table.table()],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "missing table {}", table.table());
        }
    }

    #[test]
    fn modified_index_exists_per_collection() {
        let conn = setup();
        run(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%_modified'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 8);
    }
}
