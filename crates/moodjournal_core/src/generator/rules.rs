//! Rule-based encouragement templating.
//!
//! # Invariants
//! - Output always starts with the base template for the mood.
//! - Keyword groups are evaluated in fixed order; each adds at most one
//!   sentence.
//! - The first matching addition is always appended; the second is appended
//!   with probability 0.5; later ones never.

use crate::model::entry::Mood;
use rand::Rng;

const SECOND_ADDITION_PROBABILITY: f64 = 0.5;

struct KeywordGroup {
    keywords: &'static [&'static str],
    addition: &'static str,
}

const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["pain", "discomfort", "ache"],
        addition: "If your body is hurting, please rest and give it the gentle care it needs.",
    },
    KeywordGroup {
        keywords: &["support", "family", "friend"],
        addition: "Leaning on the people around you is a strength, not a weakness.",
    },
    KeywordGroup {
        keywords: &["progress", "proud", "better"],
        addition: "Take a moment to notice how far you have come.",
    },
    KeywordGroup {
        keywords: &["fear", "anxiety", "worried", "scared"],
        addition: "If worry keeps weighing on you, talking with a mental health professional can really help.",
    },
];

/// Base message for one mood.
pub fn base_template(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => {
            "It's wonderful to hear you're feeling happy! Hold on to what made today bright."
        }
        Mood::Down => "It's okay to feel down sometimes. Be gentle with yourself today.",
        Mood::Angry => "Anger is a valid feeling. Take a slow breath before you respond.",
        Mood::Neutral => "Thanks for checking in with yourself today. Steady days count too.",
        Mood::Overwhelmed => {
            "You're carrying a lot right now. Try breaking it into one small step at a time."
        }
    }
}

/// Base message for a raw mood key; unknown keys use the neutral template.
pub fn base_template_for_key(key: &str) -> &'static str {
    base_template(key.parse().unwrap_or(Mood::Neutral))
}

/// Returns the additions whose keywords occur in `reflection`, in group order.
pub fn matching_additions(reflection: &str) -> Vec<&'static str> {
    let lowered = reflection.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .filter(|group| group.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|group| group.addition)
        .collect()
}

/// Builds the rule-based encouragement for one reflection.
pub fn rule_based_message<R: Rng + ?Sized>(mood: Mood, reflection: &str, rng: &mut R) -> String {
    compose(base_template(mood), reflection, rng)
}

/// Same as [`rule_based_message`] but keyed by a raw mood string.
pub fn rule_based_message_for_key<R: Rng + ?Sized>(
    mood_key: &str,
    reflection: &str,
    rng: &mut R,
) -> String {
    compose(base_template_for_key(mood_key), reflection, rng)
}

fn compose<R: Rng + ?Sized>(base: &str, reflection: &str, rng: &mut R) -> String {
    let additions = matching_additions(reflection);
    let mut message = base.to_string();

    if let Some(first) = additions.first() {
        message.push(' ');
        message.push_str(first);
    }
    if let Some(second) = additions.get(1) {
        if rng.gen_bool(SECOND_ADDITION_PROBABILITY) {
            message.push(' ');
            message.push_str(second);
        }
    }

    message
}
