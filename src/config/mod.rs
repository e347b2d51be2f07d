//! Configuration module - Session composition and scheduling settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.shortcut-drill/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (DrillConfig, SessionConfig, etc.)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_DUE_LIMIT, DEFAULT_FALLBACK_LIMIT, DEFAULT_FEEDBACK_DELAY_MS,
    DEFAULT_MASTERY_MIN_INTERVAL_DAYS, DEFAULT_MASTERY_MIN_STREAK, DEFAULT_NEW_LIMIT,
};

pub use types::{DrillConfig, MasteryConfig, SessionConfig};

pub use loader::{load_config, read_config};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
