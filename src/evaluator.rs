//! Answer evaluation for captured keystrokes.
//!
//! A captured keystroke is correct when it matches one of the accepted
//! combinations exactly (key token and all four modifier flags). The
//! any-arrow sentinel accepts any unmodified directional key.

use serde::{Deserialize, Serialize};

use crate::shortcuts::{KeyCombination, Keystroke, ParsedAlternatives};

/// Outcome of one answer, rendered for feedback display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub item_id: String,
    pub correct: bool,
    /// Every accepted alternative, joined by ` OR `
    pub expected: String,
    /// What the user pressed
    pub received: String,
}

/// Check if a combination accepts the captured keystroke.
pub fn accepts(combination: &KeyCombination, captured: &Keystroke) -> bool {
    match combination {
        KeyCombination::AnyArrow => captured.is_arrow() && captured.modifiers.none(),
        KeyCombination::Keys(expected) => expected == captured,
    }
}

/// Decide whether `captured` satisfies any of the `expected` alternatives.
pub fn is_correct(captured: &Keystroke, expected: &ParsedAlternatives) -> bool {
    expected.iter().any(|combination| accepts(combination, captured))
}

/// Score an answer and render both sides for display.
pub fn evaluate(
    item_id: &str,
    captured: &Keystroke,
    expected: &ParsedAlternatives,
) -> AnswerFeedback {
    AnswerFeedback {
        item_id: item_id.to_string(),
        correct: is_correct(captured, expected),
        expected: expected.display(),
        received: captured.display(),
    }
}
