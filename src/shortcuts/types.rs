//! Canonical key combination types.
//!
//! This module provides:
//! - `Modifiers` - Modifier key flags (command, option, shift, control)
//! - `Keystroke` - A concrete key token plus modifiers (expected or captured)
//! - `KeyCombination` - One accepted answer: a keystroke or the any-arrow sentinel
//! - `ParsedAlternatives` - Every accepted answer for a single shortcut
//! - Display in the feedback order: control, command, option, shift, key

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four directional key tokens, in canonical spelling.
pub const ARROW_KEYS: [&str; 4] = ["Left", "Right", "Up", "Down"];

/// Modifier keys for a keystroke.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Modifiers {
    #[serde(default)]
    pub command: bool,
    #[serde(default)]
    pub option: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub control: bool,
}

impl Modifiers {
    pub fn command() -> Self {
        Self {
            command: true,
            ..Default::default()
        }
    }
    pub fn option() -> Self {
        Self {
            option: true,
            ..Default::default()
        }
    }
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
    pub fn control() -> Self {
        Self {
            control: true,
            ..Default::default()
        }
    }
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
    pub fn with_option(mut self) -> Self {
        self.option = true;
        self
    }
    pub fn any(&self) -> bool {
        self.command || self.option || self.shift || self.control
    }
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// A key token with its modifier flags.
///
/// The key is always stored in canonical spelling (see [`canonicalize_key`]),
/// so a captured `"return"` and a parsed `"Enter"` compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Keystroke {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: impl AsRef<str>, modifiers: Modifiers) -> Self {
        Self {
            key: canonicalize_key(key.as_ref()),
            modifiers,
        }
    }

    /// A keystroke with no modifiers held.
    pub fn plain(key: impl AsRef<str>) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// Build a keystroke from a host-captured event description.
    pub fn captured(key_token: &str, modifiers: Modifiers) -> Self {
        Self::new(key_token.trim(), modifiers)
    }

    pub fn is_arrow(&self) -> bool {
        is_arrow_key(&self.key)
    }

    /// Text rendering, e.g. `Ctrl + Cmd + Shift + B`.
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.control {
            parts.push("Ctrl");
        }
        if self.modifiers.command {
            parts.push("Cmd");
        }
        if self.modifiers.option {
            parts.push("Option");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(&self.key);
        parts.join(" + ")
    }

    /// Compact glyph rendering, e.g. `⌃⌘⇧B`.
    pub fn glyphs(&self) -> String {
        let mut s = String::new();
        if self.modifiers.control {
            s.push('⌃');
        }
        if self.modifiers.command {
            s.push('⌘');
        }
        if self.modifiers.option {
            s.push('⌥');
        }
        if self.modifiers.shift {
            s.push('⇧');
        }
        s.push_str(key_glyph(&self.key));
        s
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// One accepted answer for a shortcut.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCombination {
    /// A specific key with exact modifier flags.
    Keys(Keystroke),
    /// Any of the four directional keys with no modifiers held.
    AnyArrow,
}

impl KeyCombination {
    pub fn keys(key: impl AsRef<str>, modifiers: Modifiers) -> Self {
        Self::Keys(Keystroke::new(key, modifiers))
    }

    pub fn display(&self) -> String {
        match self {
            Self::Keys(stroke) => stroke.display(),
            Self::AnyArrow => "Arrow keys".to_string(),
        }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// The set of combinations that satisfy one shortcut.
///
/// Keeps first-seen order for display; duplicates collapse on insert.
/// An empty set marks the shortcut as not trainable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAlternatives(Vec<KeyCombination>);

impl ParsedAlternatives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a combination. Returns false if it was already present.
    pub fn insert(&mut self, combination: KeyCombination) -> bool {
        if self.0.contains(&combination) {
            return false;
        }
        self.0.push(combination);
        true
    }

    pub fn contains(&self, combination: &KeyCombination) -> bool {
        self.0.contains(combination)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyCombination> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every alternative joined by ` OR `.
    pub fn display(&self) -> String {
        self.0
            .iter()
            .map(KeyCombination::display)
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

impl FromIterator<KeyCombination> for ParsedAlternatives {
    fn from_iter<I: IntoIterator<Item = KeyCombination>>(iter: I) -> Self {
        let mut set = Self::new();
        for combination in iter {
            set.insert(combination);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ParsedAlternatives {
    type Item = &'a KeyCombination;
    type IntoIter = std::slice::Iter<'a, KeyCombination>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ParsedAlternatives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Canonicalize a single key token to the fixed vocabulary.
///
/// Unrecognized tokens pass through verbatim, except that a lone letter
/// is uppercased.
pub fn canonicalize_key(key: &str) -> String {
    let key = key.trim();
    let key_lower = key.to_lowercase();
    let canonical = match key_lower.as_str() {
        "return" | "enter" | "↩" | "⏎" | "⌤" => "Enter",
        "esc" | "escape" | "⎋" => "Esc",
        "del" | "delete" | "backspace" | "⌫" => "Delete",
        "tab" | "⇥" => "Tab",
        "space" | "spacebar" | "␣" => "Space",
        "home" | "↖" => "Home",
        "end" | "↘" => "End",
        "left" | "leftarrow" | "arrowleft" | "←" => "Left",
        "right" | "rightarrow" | "arrowright" | "→" => "Right",
        "up" | "uparrow" | "arrowup" | "↑" => "Up",
        "down" | "downarrow" | "arrowdown" | "↓" => "Down",
        "pageup" | "pgup" | "⇞" => "PageUp",
        "pagedown" | "pgdn" | "pgdown" | "⇟" => "PageDown",
        "fn" | "function" => "Fn",
        _ => {
            if let Some(number) = function_key_number(&key_lower) {
                return format!("F{}", number);
            }
            let mut chars = key.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_alphabetic() => c.to_uppercase().collect(),
                _ => key.to_string(),
            };
        }
    };
    canonical.to_string()
}

/// `f1`..`f24` -> the function key number.
fn function_key_number(key_lower: &str) -> Option<u8> {
    let digits = key_lower.strip_prefix('f')?;
    let number: u8 = digits.parse().ok()?;
    (1..=24).contains(&number).then_some(number)
}

/// Check if a canonical key token is one of the four directional keys.
pub fn is_arrow_key(key: &str) -> bool {
    ARROW_KEYS.contains(&key)
}

fn key_glyph(key: &str) -> &str {
    match key {
        "Enter" => "↩",
        "Esc" => "⎋",
        "Tab" => "⇥",
        "Space" => "␣",
        "Delete" => "⌫",
        "Up" => "↑",
        "Down" => "↓",
        "Left" => "←",
        "Right" => "→",
        "Home" => "↖",
        "End" => "↘",
        "PageUp" => "⇞",
        "PageDown" => "⇟",
        k => k,
    }
}
