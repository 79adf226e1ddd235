//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage adapter contract used by the entry service.
//! - Isolate SQLite and JSON encoding details from orchestration.
//!
//! # Invariants
//! - Reads fail soft: unreadable or malformed state is an empty journal.
//! - Writes report failures to the caller and never retry.

pub mod entry_repo;
