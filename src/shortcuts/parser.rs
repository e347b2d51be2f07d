//! Free-form shortcut description parsing.
//!
//! Turns strings like `"Cmd + Option + B"`, `"⌘⇧Z / Cmd Y"` or
//! `"Left Arrow or Right Arrow"` into the set of key combinations that
//! satisfy them. Anything that cannot be answered by a single key event
//! (mouse gestures, instructions, ambiguous fragments) is dropped from the
//! result instead of being reported as an error.

use tracing::trace;

use super::types::{canonicalize_key, KeyCombination, Keystroke, Modifiers, ParsedAlternatives};

/// Phrases that mark an alternative as a pointer or manual instruction.
const NON_KEYSTROKE_MARKERS: &[&str] = &["click", "drag", "scroll", "mouse", "toggle between"];

/// Phrases that stand for "press any arrow key" when they make up the whole key part.
const ANY_ARROW_PHRASES: &[&str] = &[
    "arrow keys",
    "arrow key",
    "arrows",
    "any arrow",
    "any arrow key",
    "any arrow keys",
];

/// Glyphs that are split out of a word even when written without spaces (`⌘⇧B`, `^C`).
const MODIFIER_GLYPHS: &[char] = &['⌘', '⌥', '⇧', '⌃', '^'];

/// Direction words and their canonical key tokens.
const DIRECTIONS: &[(&str, &str)] = &[
    ("left", "Left"),
    ("right", "Right"),
    ("up", "Up"),
    ("down", "Down"),
];

/// One alternative and whether a `/` separator introduced it.
struct Fragment<'a> {
    lexemes: &'a [String],
    after_slash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ModifierKind {
    Command,
    Option,
    Shift,
    Control,
}

/// Parse a shortcut description into its accepted key combinations.
///
/// The result is empty when no alternative describes a single keystroke.
pub fn parse(raw: &str) -> ParsedAlternatives {
    let lexemes = lex(raw);
    let mut result = ParsedAlternatives::new();
    // Modifiers of the fragment before a `/`, shared with a bare key after it (`Shift + Up/Down`)
    let mut shared: Option<Modifiers> = None;

    for fragment in split_alternatives(&lexemes) {
        let parsed = parse_alternative(fragment.lexemes).map(|combination| match combination {
            KeyCombination::Keys(mut stroke) if fragment.after_slash && stroke.modifiers.none() => {
                if let Some(modifiers) = shared {
                    stroke.modifiers = modifiers;
                }
                KeyCombination::Keys(stroke)
            }
            other => other,
        });

        shared = match &parsed {
            Some(KeyCombination::Keys(stroke)) if stroke.modifiers.any() => Some(stroke.modifiers),
            _ => None,
        };

        match parsed {
            Some(combination) => {
                result.insert(combination);
            }
            None => trace!(raw = raw, fragment = ?fragment.lexemes, "Discarded alternative"),
        }
    }

    result
}

/// Split into words, keeping `+` and `/` as their own lexemes and
/// separating modifier glyphs from whatever follows them.
fn lex(raw: &str) -> Vec<String> {
    let mut lexemes = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, lexemes: &mut Vec<String>| {
        if !word.is_empty() {
            lexemes.push(std::mem::take(word));
        }
    };

    for c in raw.chars() {
        if c.is_whitespace() {
            flush(&mut word, &mut lexemes);
        } else if c == '+' || c == '/' || MODIFIER_GLYPHS.contains(&c) {
            flush(&mut word, &mut lexemes);
            lexemes.push(c.to_string());
        } else {
            word.push(c);
        }
    }
    flush(&mut word, &mut lexemes);

    lexemes
}

/// Split lexemes on `or` and on `/` used as a separator.
///
/// A `/` is the slash key rather than a separator when it sits at either
/// end, next to a `+` joiner, or directly after a modifier (`Cmd /`).
fn split_alternatives(lexemes: &[String]) -> Vec<Fragment<'_>> {
    let mut alternatives = Vec::new();
    let mut start = 0;
    let mut after_slash = false;

    for (i, lexeme) in lexemes.iter().enumerate() {
        let is_slash = lexeme == "/"
            && i > 0
            && i + 1 < lexemes.len()
            && lexemes[i - 1] != "+"
            && lexemes[i + 1] != "+"
            && modifier_kind(&lexemes[i - 1]).is_none();

        if is_slash || lexeme.eq_ignore_ascii_case("or") {
            alternatives.push(Fragment {
                lexemes: &lexemes[start..i],
                after_slash,
            });
            start = i + 1;
            after_slash = is_slash;
        }
    }
    alternatives.push(Fragment {
        lexemes: &lexemes[start..],
        after_slash,
    });

    alternatives.retain(|alt| !alt.lexemes.is_empty());
    alternatives
}

fn parse_alternative(lexemes: &[String]) -> Option<KeyCombination> {
    let lowered = lexemes.join(" ").to_lowercase();
    if NON_KEYSTROKE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return None;
    }

    let mut modifiers = Modifiers::default();
    let mut keys: Vec<&str> = Vec::new();

    for (i, lexeme) in lexemes.iter().enumerate() {
        if lexeme == "+" && !is_plus_key(lexemes, i) {
            continue;
        }
        match modifier_kind(lexeme) {
            Some(ModifierKind::Command) => modifiers.command = true,
            Some(ModifierKind::Option) => modifiers.option = true,
            Some(ModifierKind::Shift) => modifiers.shift = true,
            Some(ModifierKind::Control) => modifiers.control = true,
            None => keys.push(lexeme),
        }
    }

    let key_phrase = keys.join(" ").to_lowercase();
    if ANY_ARROW_PHRASES.contains(&key_phrase.as_str()) {
        // The sentinel carries no modifiers, so a modified arrow phrase has no representation.
        return modifiers.none().then_some(KeyCombination::AnyArrow);
    }

    let key = merge_key_tokens(&keys)?;
    Some(KeyCombination::Keys(Keystroke { key, modifiers }))
}

/// A trailing `+` is the plus key when nothing but modifiers or joiners precede it.
fn is_plus_key(lexemes: &[String], i: usize) -> bool {
    if i + 1 != lexemes.len() {
        return false;
    }
    match i.checked_sub(1).map(|p| &lexemes[p]) {
        None => true,
        Some(prev) => prev == "+" || modifier_kind(prev).is_some(),
    }
}

fn modifier_kind(token: &str) -> Option<ModifierKind> {
    match token.to_lowercase().as_str() {
        "cmd" | "command" | "meta" | "⌘" => Some(ModifierKind::Command),
        "opt" | "option" | "alt" | "⌥" => Some(ModifierKind::Option),
        "shift" | "shft" | "⇧" => Some(ModifierKind::Shift),
        "ctrl" | "control" | "ctl" | "^" | "⌃" => Some(ModifierKind::Control),
        _ => None,
    }
}

/// Reduce the non-modifier tokens of one alternative to a single key.
///
/// Multi-word names (`left arrow`, `down arrow keys`, `page down`,
/// `space bar`) merge into one token; any other combination of several
/// words is rejected.
fn merge_key_tokens(tokens: &[&str]) -> Option<String> {
    let mut words: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    if words.len() > 1 && words.last().is_some_and(|w| w == "key" || w == "keys") {
        words.pop();
    }
    if let Some(direction) = arrow_direction(&words) {
        return Some(direction.to_string());
    }

    match tokens.len() {
        0 => return None,
        1 => return Some(canonicalize_key(tokens[0])),
        _ if words.len() == 1 => return Some(canonicalize_key(tokens[0])),
        _ => {}
    }

    let merged = match words.join(" ").as_str() {
        "page up" => "PageUp",
        "page down" => "PageDown",
        "space bar" => "Space",
        _ => return None,
    };
    Some(merged.to_string())
}

/// `<direction> arrow[s]` or `arrow <direction>` as a single directional key.
fn arrow_direction(words: &[String]) -> Option<&'static str> {
    let [first, second] = words else {
        return None;
    };
    let direction = if second == "arrow" || second == "arrows" {
        first
    } else if first == "arrow" {
        second
    } else {
        return None;
    };
    DIRECTIONS
        .iter()
        .find(|(word, _)| *word == direction.as_str())
        .map(|&(_, key)| key)
}
