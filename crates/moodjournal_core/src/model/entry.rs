//! Entry domain model.
//!
//! # Responsibility
//! - Define the canonical journal record and its wire shape.
//! - Reject invalid records at construction and at deserialization.
//!
//! # Invariants
//! - `id` is never blank.
//! - `reflection` is trimmed and never blank.
//! - `date` is a calendar date without time-of-day (`YYYY-MM-DD` on the wire).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque entry identifier, derived from the creation timestamp.
pub type EntryId = String;

/// Self-reported emotional state attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Down,
    Angry,
    Neutral,
    Overwhelmed,
}

impl Mood {
    /// All moods in the order the picker presents them.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Down,
        Mood::Angry,
        Mood::Neutral,
        Mood::Overwhelmed,
    ];

    /// Stable wire key (`happy`, `down`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Down => "down",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
            Self::Overwhelmed => "overwhelmed",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mood key is not one of the five known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodParseError(pub String);

impl Display for MoodParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown mood `{}`; expected happy|down|angry|neutral|overwhelmed",
            self.0
        )
    }
}

impl Error for MoodParseError {}

impl FromStr for Mood {
    type Err = MoodParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "down" => Ok(Self::Down),
            "angry" => Ok(Self::Angry),
            "neutral" => Ok(Self::Neutral),
            "overwhelmed" => Ok(Self::Overwhelmed),
            _ => Err(MoodParseError(value.to_string())),
        }
    }
}

/// Validation failures for entry input and persisted entry shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    /// No mood was selected.
    MissingMood,
    /// Reflection is empty after trimming.
    EmptyReflection,
    /// Persisted entry carries a blank id.
    EmptyId,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMood => write!(f, "a mood must be selected"),
            Self::EmptyReflection => write!(f, "reflection cannot be empty"),
            Self::EmptyId => write!(f, "entry id cannot be empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// One persisted journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryWire")]
pub struct Entry {
    pub id: EntryId,
    /// Local creation date.
    pub date: NaiveDate,
    pub mood: Mood,
    /// Trimmed free text, never blank.
    pub reflection: String,
    /// Generated once at creation time.
    pub encouragement: String,
}

impl Entry {
    /// Builds an entry, trimming the reflection and enforcing invariants.
    pub fn new(
        id: impl Into<EntryId>,
        date: NaiveDate,
        mood: Mood,
        reflection: &str,
        encouragement: impl Into<String>,
    ) -> Result<Self, EntryValidationError> {
        let entry = Self {
            id: id.into(),
            date,
            mood,
            reflection: reflection.trim().to_string(),
            encouragement: encouragement.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Checks the invariants shared by constructors and decoding.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if self.reflection.trim().is_empty() {
            return Err(EntryValidationError::EmptyReflection);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct EntryWire {
    id: EntryId,
    date: NaiveDate,
    mood: Mood,
    reflection: String,
    encouragement: String,
}

impl TryFrom<EntryWire> for Entry {
    type Error = EntryValidationError;

    fn try_from(wire: EntryWire) -> Result<Self, Self::Error> {
        let entry = Entry {
            id: wire.id,
            date: wire.date,
            mood: wire.mood,
            reflection: wire.reflection,
            encouragement: wire.encouragement,
        };
        entry.validate()?;
        Ok(entry)
    }
}
