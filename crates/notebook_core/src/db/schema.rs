//! Snapshot schema bootstrap and version checks.
//!
//! # Invariants
//! - A snapshot file carries exactly `SCHEMA_VERSION` in `PRAGMA user_version`.
//! - Version 0 means the file was never written as a snapshot.
//! - Snapshots are never upgraded in place.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written into every snapshot.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("snapshot_schema.sql");

/// Creates snapshot tables on a fresh database.
///
/// A database already at `SCHEMA_VERSION` is left as is.
pub fn init_schema(conn: &mut Connection) -> DbResult<()> {
    match schema_version(conn)? {
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
            tx.commit()?;
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        other => Err(unsupported(other)),
    }
}

/// Checks that an existing snapshot was written with `SCHEMA_VERSION`.
pub fn ensure_snapshot_schema(conn: &Connection) -> DbResult<()> {
    match schema_version(conn)? {
        0 => Err(DbError::UninitializedSchema),
        SCHEMA_VERSION => Ok(()),
        other => Err(unsupported(other)),
    }
}

fn unsupported(db_version: u32) -> DbError {
    DbError::UnsupportedSchemaVersion {
        db_version,
        latest_supported: SCHEMA_VERSION,
    }
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
