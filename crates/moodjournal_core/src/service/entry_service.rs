//! Entry lifecycle service.
//!
//! # Responsibility
//! - Validate input, generate encouragement, and persist new entries.
//! - Delete entries by id and list the journal.
//!
//! # Invariants
//! - Validation failures happen before any generator or storage call.
//! - Every mutation re-reads the full journal, changes it, and writes it back.
//! - New entries are prepended so the journal stays newest-first.
//! - The service holds no copy of the journal between calls.

use crate::generator::{EncouragementGenerator, GenerationSource};
use crate::model::entry::{Entry, EntryValidationError, Mood};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Source of "now" for ids and entry dates.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Input was incomplete; nothing was generated or stored.
    Validation(EntryValidationError),
    /// Writing the journal failed.
    Storage(RepoError),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "failed to save journal: {err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for EntryServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntry {
    pub entry: Entry,
    /// Path that produced `entry.encouragement`.
    pub source: GenerationSource,
}

/// Entry service facade over a repository and a generator.
pub struct EntryService<R: EntryRepository, C: Clock = SystemClock> {
    repo: R,
    generator: EncouragementGenerator,
    clock: C,
}

impl<R: EntryRepository> EntryService<R, SystemClock> {
    /// Creates a service using the wall clock.
    pub fn new(repo: R, generator: EncouragementGenerator) -> Self {
        Self::with_clock(repo, generator, SystemClock)
    }
}

impl<R: EntryRepository, C: Clock> EntryService<R, C> {
    pub fn with_clock(repo: R, generator: EncouragementGenerator, clock: C) -> Self {
        Self {
            repo,
            generator,
            clock,
        }
    }

    /// Creates, persists, and returns one entry.
    ///
    /// # Errors
    /// - `Validation` when `mood` is `None` or `reflection_raw` is blank.
    /// - `Storage` when the journal cannot be written; the entry is discarded.
    pub fn create_entry<G: Rng + ?Sized>(
        &self,
        mood: Option<Mood>,
        reflection_raw: &str,
        rng: &mut G,
    ) -> Result<CreatedEntry, EntryServiceError> {
        let mood = mood.ok_or(EntryValidationError::MissingMood)?;
        let reflection = reflection_raw.trim();
        if reflection.is_empty() {
            return Err(EntryValidationError::EmptyReflection.into());
        }

        let now = self.clock.now();
        let id = now.timestamp_millis().to_string();
        let outcome = self.generator.generate(mood, reflection, rng);
        let entry = Entry::new(id, now.date_naive(), mood, reflection, outcome.text)?;

        let mut entries = self.repo.load_all();
        entries.insert(0, entry.clone());
        if let Err(err) = self.repo.save_all(&entries) {
            warn!(
                "event=entry_create module=service status=error error_code=save_failed entry_id={} error={}",
                entry.id, err
            );
            return Err(err.into());
        }

        info!(
            "event=entry_create module=service status=ok entry_id={} mood={} source={} reflection_len={} total={}",
            entry.id,
            entry.mood,
            outcome.source.as_str(),
            entry.reflection.chars().count(),
            entries.len()
        );
        Ok(CreatedEntry {
            entry,
            source: outcome.source,
        })
    }

    /// Removes the entry with `id`.
    ///
    /// An absent id is not an error and leaves the stored value untouched,
    /// including a value that currently reads as empty because it is corrupt.
    pub fn delete_entry(&self, id: &str) -> Result<(), EntryServiceError> {
        let mut entries = self.repo.load_all();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = before - entries.len();

        if removed == 0 {
            debug!("event=entry_delete module=service status=skipped entry_id={id} reason=not_found");
            return Ok(());
        }

        self.repo.save_all(&entries)?;
        info!(
            "event=entry_delete module=service status=ok entry_id={} removed={} total={}",
            id,
            removed,
            entries.len()
        );
        Ok(())
    }

    /// Returns the journal newest-first, as stored.
    pub fn list_entries(&self) -> Vec<Entry> {
        self.repo.load_all()
    }
}
