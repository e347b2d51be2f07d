//! Shortcut Drill - keyboard shortcut recall training
//!
//! This library provides the core of a shortcut trainer: parsing free-form
//! shortcut descriptions into accepted key combinations, scoring captured
//! keystrokes, and scheduling reviews with a spaced-repetition rule.
//! Rendering and keystroke capture belong to the host.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod progress;

// Progress scheduling and session queue
pub mod scheduler;

// Shortcut description parsing
pub mod shortcuts;

pub use catalog::{CatalogEntry, ShortcutCatalog};
pub use config::DrillConfig;
pub use dataset::{load_dataset, ShortcutDataset, ShortcutItem};
pub use error::{DrillError, ResultExt};
pub use evaluator::AnswerFeedback;
pub use progress::{JsonProgressStore, MemoryProgressStore, ProgressRecord, ProgressStore};
pub use scheduler::{Clock, SchedulingEngine, SessionState, SystemClock};
pub use shortcuts::{parse, KeyCombination, Keystroke, Modifiers, ParsedAlternatives};
