//! Two-step journaling wizard as explicit view state.
//!
//! # Responsibility
//! - Hold the wizard state that front ends render from.
//! - Gate transitions on form completeness and on "one save in flight".
//!
//! # Invariants
//! - Transitions are pure: they consume a state and return a new one.
//! - `saving` is only ever set from `Reflecting` with a complete form.
//! - Expand/collapse flags survive `start_over`.

pub mod view;

use crate::model::entry::{EntryId, Mood};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current wizard screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    MoodSelection,
    Reflecting,
    ShowingEncouragement,
}

/// Rejected wizard transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Transition is not valid from the current step.
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },
    MoodRequired,
    ReflectionRequired,
    SaveInFlight,
    NotSaving,
}

impl Display for FlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongStep { action, step } => {
                write!(f, "`{action}` is not allowed in step {step:?}")
            }
            Self::MoodRequired => write!(f, "select a mood first"),
            Self::ReflectionRequired => write!(f, "write a reflection first"),
            Self::SaveInFlight => write!(f, "a save is already in progress"),
            Self::NotSaving => write!(f, "no save is in progress"),
        }
    }
}

impl Error for FlowError {}

pub type FlowResult = Result<ViewState, FlowError>;

/// Serializable wizard state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub step: WizardStep,
    pub selected_mood: Option<Mood>,
    pub reflection_text: String,
    /// True while a create is in flight; the save control must be disabled.
    pub saving: bool,
    pub last_encouragement: Option<String>,
    /// Entries whose full reflection is shown in the list.
    pub expanded: BTreeSet<EntryId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the save control should be enabled.
    pub fn can_save(&self) -> bool {
        self.step == WizardStep::Reflecting
            && !self.saving
            && self.selected_mood.is_some()
            && !self.reflection_text.trim().is_empty()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }
}

pub fn select_mood(mut state: ViewState, mood: Mood) -> FlowResult {
    if state.saving {
        return Err(FlowError::SaveInFlight);
    }
    match state.step {
        WizardStep::MoodSelection | WizardStep::Reflecting => {
            state.selected_mood = Some(mood);
            Ok(state)
        }
        WizardStep::ShowingEncouragement => Err(FlowError::WrongStep {
            action: "select_mood",
            step: WizardStep::ShowingEncouragement,
        }),
    }
}

pub fn continue_to_reflection(mut state: ViewState) -> FlowResult {
    if state.step != WizardStep::MoodSelection {
        return Err(FlowError::WrongStep {
            action: "continue_to_reflection",
            step: state.step,
        });
    }
    if state.selected_mood.is_none() {
        return Err(FlowError::MoodRequired);
    }
    state.step = WizardStep::Reflecting;
    Ok(state)
}

/// Returns to the mood picker, keeping the draft reflection.
pub fn back_to_mood(mut state: ViewState) -> FlowResult {
    if state.step != WizardStep::Reflecting {
        return Err(FlowError::WrongStep {
            action: "back_to_mood",
            step: state.step,
        });
    }
    if state.saving {
        return Err(FlowError::SaveInFlight);
    }
    state.step = WizardStep::MoodSelection;
    Ok(state)
}

pub fn edit_reflection(mut state: ViewState, text: impl Into<String>) -> FlowResult {
    if state.step != WizardStep::Reflecting {
        return Err(FlowError::WrongStep {
            action: "edit_reflection",
            step: state.step,
        });
    }
    if state.saving {
        return Err(FlowError::SaveInFlight);
    }
    state.reflection_text = text.into();
    Ok(state)
}

/// Marks a create as in flight. Rejects a second concurrent save.
pub fn begin_save(mut state: ViewState) -> FlowResult {
    if state.saving {
        return Err(FlowError::SaveInFlight);
    }
    if state.step != WizardStep::Reflecting {
        return Err(FlowError::WrongStep {
            action: "begin_save",
            step: state.step,
        });
    }
    if state.selected_mood.is_none() {
        return Err(FlowError::MoodRequired);
    }
    if state.reflection_text.trim().is_empty() {
        return Err(FlowError::ReflectionRequired);
    }
    state.saving = true;
    Ok(state)
}

pub fn finish_save(mut state: ViewState, encouragement: impl Into<String>) -> FlowResult {
    if !state.saving {
        return Err(FlowError::NotSaving);
    }
    state.saving = false;
    state.step = WizardStep::ShowingEncouragement;
    state.last_encouragement = Some(encouragement.into());
    Ok(state)
}

/// Clears the in-flight flag after a failed save; the draft is kept.
pub fn abort_save(mut state: ViewState) -> FlowResult {
    if !state.saving {
        return Err(FlowError::NotSaving);
    }
    state.saving = false;
    Ok(state)
}

pub fn start_over(state: ViewState) -> FlowResult {
    if state.saving {
        return Err(FlowError::SaveInFlight);
    }
    Ok(ViewState {
        expanded: state.expanded,
        ..ViewState::default()
    })
}

pub fn toggle_expanded(mut state: ViewState, id: &str) -> ViewState {
    if !state.expanded.remove(id) {
        state.expanded.insert(id.to_string());
    }
    state
}

/// Marks every id in `ids` expanded; repeated ids stay expanded.
pub fn expand_entries<I, S>(mut state: ViewState, ids: I) -> ViewState
where
    I: IntoIterator<Item = S>,
    S: Into<EntryId>,
{
    state.expanded.extend(ids.into_iter().map(Into::into));
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_to_save() -> ViewState {
        let state = select_mood(ViewState::new(), Mood::Happy).unwrap();
        let state = continue_to_reflection(state).unwrap();
        edit_reflection(state, "Today was good").unwrap()
    }

    #[test]
    fn continue_requires_mood() {
        let err = continue_to_reflection(ViewState::new()).unwrap_err();
        assert_eq!(err, FlowError::MoodRequired);
    }

    #[test]
    fn save_is_gated_on_reflection_text() {
        let state = select_mood(ViewState::new(), Mood::Down).unwrap();
        let state = continue_to_reflection(state).unwrap();
        let state = edit_reflection(state, "   ").unwrap();
        assert!(!state.can_save());
        assert_eq!(begin_save(state).unwrap_err(), FlowError::ReflectionRequired);
    }

    #[test]
    fn only_one_save_in_flight() {
        let state = begin_save(ready_to_save()).unwrap();
        assert!(state.saving);
        assert!(!state.can_save());
        assert_eq!(begin_save(state.clone()).unwrap_err(), FlowError::SaveInFlight);
        assert_eq!(
            edit_reflection(state, "changed").unwrap_err(),
            FlowError::SaveInFlight
        );
    }

    #[test]
    fn finish_save_shows_encouragement_then_start_over_resets_form() {
        let state = begin_save(ready_to_save()).unwrap();
        let state = toggle_expanded(state, "42");
        let state = finish_save(state, "Keep going.").unwrap();
        assert_eq!(state.step, WizardStep::ShowingEncouragement);
        assert_eq!(state.last_encouragement.as_deref(), Some("Keep going."));
        assert!(!state.saving);

        let state = start_over(state).unwrap();
        assert_eq!(state.step, WizardStep::MoodSelection);
        assert!(state.selected_mood.is_none());
        assert!(state.reflection_text.is_empty());
        assert!(state.is_expanded("42"));
    }

    #[test]
    fn abort_save_keeps_draft() {
        let state = begin_save(ready_to_save()).unwrap();
        let state = abort_save(state).unwrap();
        assert_eq!(state.step, WizardStep::Reflecting);
        assert_eq!(state.reflection_text, "Today was good");
        assert!(state.can_save());
    }

    #[test]
    fn back_to_mood_keeps_draft_text() {
        let state = back_to_mood(ready_to_save()).unwrap();
        assert_eq!(state.step, WizardStep::MoodSelection);
        assert_eq!(state.reflection_text, "Today was good");
    }

    #[test]
    fn toggle_expanded_flips_flag() {
        let state = toggle_expanded(ViewState::new(), "1");
        assert!(state.is_expanded("1"));
        let state = toggle_expanded(state, "1");
        assert!(!state.is_expanded("1"));
    }

    #[test]
    fn expand_entries_ignores_repeated_ids() {
        let state = expand_entries(ViewState::new(), ["7", "7", "9"]);
        assert!(state.is_expanded("7"));
        assert!(state.is_expanded("9"));
        assert_eq!(state.expanded.len(), 2);

        let state = expand_entries(state, ["7"]);
        assert!(state.is_expanded("7"));
    }

    #[test]
    fn view_state_serializes_step_as_snake_case() {
        let json = serde_json::to_value(ready_to_save()).unwrap();
        assert_eq!(json["step"], "reflecting");
        assert_eq!(json["selected_mood"], "happy");
    }
}
