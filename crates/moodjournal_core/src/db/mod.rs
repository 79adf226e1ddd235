//! Backing store bootstrap for the journal.
//!
//! The store is one SQLite database. Its schema is a short list of
//! migrations whose progress is kept in `PRAGMA user_version`; nothing reads
//! or writes journal data until that list is fully applied.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to bring a backing store to a usable schema.
#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened or configured.
    Open(rusqlite::Error),
    /// Migration `version` failed; earlier versions stay applied.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open journal store: {err}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "journal store schema {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}
