//! Shortcut descriptions and canonical key combinations.
//!
//! This module provides:
//! - Canonical key combination types (modifier flags + key token)
//! - Parsing of free-form shortcut descriptions into accepted alternatives
//! - Key name canonicalization shared by the parser and the capture boundary
//!
//! # Example
//!
//! ```
//! use shortcut_drill::shortcuts::{parse, KeyCombination, Modifiers};
//!
//! let alternatives = parse("Cmd + Option + B");
//! let expected = KeyCombination::keys("B", Modifiers::command().with_option());
//! assert!(alternatives.contains(&expected));
//! ```

mod parser;
mod types;


pub use parser::parse;
pub use types::{
    canonicalize_key, is_arrow_key, KeyCombination, Keystroke, Modifiers, ParsedAlternatives,
    ARROW_KEYS,
};
