//! Core domain logic for the mood journal.
//! This crate owns entry invariants, encouragement generation and storage.

pub mod config;
pub mod db;
pub mod flow;
pub mod generator;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DelegateConfig, JournalConfig, LoggingConfig};
pub use flow::view::{entry_excerpt, entry_rows, reflection_counter, EntryRow, ReflectionCounter};
pub use flow::{FlowError, ViewState, WizardStep};
pub use generator::delegate::{
    EncouragementRequest, EncouragementSource, GenerationError, HttpEncouragementSource,
};
pub use generator::{EncouragementGenerator, GenerationOutcome, GenerationSource};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::entry::{Entry, EntryId, EntryValidationError, Mood, MoodParseError};
pub use repo::entry_repo::{
    EntryRepository, RepoError, RepoResult, SqliteEntryRepository, DEFAULT_STORAGE_KEY,
};
pub use service::entry_service::{
    Clock, CreatedEntry, EntryService, EntryServiceError, SystemClock,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
