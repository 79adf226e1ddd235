//! Schema migrations for the journal store.
//!
//! # Invariants
//! - Versions are listed in increasing order and never reused.
//! - Each migration commits together with its `user_version` bump.

use crate::db::DbError;
use log::info;
use rusqlite::Connection;

/// `(version, sql)` pairs, oldest first.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

/// Returns the newest schema version this build can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded in the store.
pub fn schema_version(conn: &Connection) -> Result<u32, DbError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Open)
}

/// Brings the store up to [`latest_version`] and returns that version.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store is newer than this build.
/// - `Migration` naming the first version that failed to apply.
pub fn apply_migrations(conn: &mut Connection) -> Result<u32, DbError> {
    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for &(version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        apply_one(conn, version, sql).map_err(|source| DbError::Migration { version, source })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    Ok(latest)
}

fn apply_one(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}
