//! Embedded schema migrations keyed by `PRAGMA user_version`.
//!
//! Each step runs in its own transaction together with the version bump, so
//! an interrupted upgrade leaves the database at the last completed step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(target user_version, SQL)` in ascending order.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Schema version this binary upgrades databases to.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|(version, _)| *version).max().unwrap_or(0)
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings `conn` up to [`latest_version`].
///
/// Fails with `UnsupportedSchemaVersion` when the database was written by a
/// newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let to_version = latest_version();
    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    for (version, sql) in STEPS.iter().filter(|(version, _)| *version > from_version) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!("event=db_migrate module=db status=ok step={version}");
    }

    if from_version < to_version {
        info!(
            "event=db_migrate module=db status=done from_version={from_version} to_version={to_version}"
        );
    }
    Ok(())
}
