//! Entry storage adapter over the SQLite key-value table.
//!
//! # Responsibility
//! - Load and store the whole journal as one JSON array under one key.
//! - Keep the fail-soft read policy in one place.
//!
//! # Invariants
//! - `load_all` never returns an error; malformed values read as empty.
//! - `save_all` replaces the full stored value in one statement.
//! - Stored order is the caller's order (newest-first by convention).

use crate::model::entry::Entry;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Key used when configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "moodjournal.entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage adapter error for write paths and repository setup.
#[derive(Debug)]
pub enum RepoError {
    Db(rusqlite::Error),
    Serialize(serde_json::Error),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "journal store error: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode entries: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Whole-journal storage contract.
pub trait EntryRepository {
    /// Returns every stored entry in stored order, or empty on any read failure.
    fn load_all(&self) -> Vec<Entry>;
    /// Replaces the stored journal with `entries`.
    fn save_all(&self, entries: &[Entry]) -> RepoResult<()>;
}

/// SQLite-backed entry repository storing one JSON array per key.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    storage_key: String,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection using the default key.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_key(conn, DEFAULT_STORAGE_KEY)
    }

    /// Constructs a repository bound to a caller-chosen storage key.
    pub fn with_key(conn: &'conn Connection, storage_key: impl Into<String>) -> RepoResult<Self> {
        ensure_kv_connection_ready(conn)?;
        Ok(Self {
            conn,
            storage_key: storage_key.into(),
        })
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_str()
    }

    fn read_raw(&self) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.storage_key.as_str()],
                |row| row.get(0),
            )
            .optional()
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn load_all(&self) -> Vec<Entry> {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=entries_load module=repo status=error error_code=store_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                debug!(
                    "event=entries_load module=repo status=ok count={}",
                    entries.len()
                );
                entries
            }
            Err(err) => {
                warn!(
                    "event=entries_load module=repo status=error error_code=store_parse_failed value_len={} error={}",
                    raw.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save_all(&self, entries: &[Entry]) -> RepoResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string(entries)?;

        let result = self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.storage_key.as_str(), encoded],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=entries_save module=repo status=ok count={} duration_ms={}",
                    entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=entries_save module=repo status=error error_code=store_write_failed count={} error={}",
                    entries.len(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn ensure_kv_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "kv_store")? {
        return Err(RepoError::MissingRequiredTable("kv_store"));
    }

    for column in ["key", "value"] {
        if !table_has_column(conn, "kv_store", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_store",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
