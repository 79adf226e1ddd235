//! Journal domain model.
//!
//! # Responsibility
//! - Define the persisted `Entry` record and the `Mood` enum.
//! - Own the validation rules every persisted entry must satisfy.
//!
//! # Invariants
//! - Every persisted entry has a non-empty id and a non-empty trimmed
//!   reflection.
//! - Entries are immutable once created; deletion removes them outright.

pub mod entry;
