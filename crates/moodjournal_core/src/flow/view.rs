//! Derived presentation values for the wizard and entry list.
//!
//! Nothing here mutates state; every value is re-derived from the stored
//! entry and the current `ViewState`.

use super::ViewState;
use crate::model::entry::{Entry, Mood};
use chrono::NaiveDate;

/// Reflection length in code points shown in list rows when collapsed.
pub const DEFAULT_EXCERPT_LENGTH: usize = 120;
const ELLIPSIS: char = '…';

/// Character counter shown under the reflection input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionCounter {
    pub used: usize,
    pub max: usize,
    pub over_limit: bool,
}

/// Counts code points against the soft display cap. Text is never truncated.
pub fn reflection_counter(text: &str, max: usize) -> ReflectionCounter {
    let used = text.chars().count();
    ReflectionCounter {
        used,
        max,
        over_limit: used > max,
    }
}

/// Full reflection when expanded or short enough, otherwise a prefix plus `…`.
pub fn entry_excerpt(reflection: &str, expanded: bool, limit: usize) -> String {
    if expanded || reflection.chars().count() <= limit {
        return reflection.to_string();
    }
    let mut excerpt: String = reflection.chars().take(limit).collect();
    excerpt.truncate(excerpt.trim_end().len());
    excerpt.push(ELLIPSIS);
    excerpt
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: String,
    pub date: NaiveDate,
    pub mood: Mood,
    pub reflection: String,
    pub encouragement: String,
    pub expanded: bool,
    /// Whether the row can be toggled at all.
    pub expandable: bool,
}

/// Builds list rows from stored entries and the expand flags in `state`.
pub fn entry_rows(entries: &[Entry], state: &ViewState, excerpt_limit: usize) -> Vec<EntryRow> {
    entries
        .iter()
        .map(|entry| {
            let expanded = state.is_expanded(entry.id.as_str());
            EntryRow {
                id: entry.id.clone(),
                date: entry.date,
                mood: entry.mood,
                reflection: entry_excerpt(entry.reflection.as_str(), expanded, excerpt_limit),
                encouragement: entry.encouragement.clone(),
                expanded,
                expandable: entry.reflection.chars().count() > excerpt_limit,
            }
        })
        .collect()
}
