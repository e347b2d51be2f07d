//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Default session composition limits
pub const DEFAULT_DUE_LIMIT: usize = 30;
pub const DEFAULT_NEW_LIMIT: usize = 10;
pub const DEFAULT_FALLBACK_LIMIT: usize = 30;

/// Default mastery thresholds
pub const DEFAULT_MASTERY_MIN_INTERVAL_DAYS: u32 = 30;
pub const DEFAULT_MASTERY_MIN_STREAK: u32 = 3;

/// Default delay between showing feedback and presenting the next item
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 250;

/// Config file location, tilde-expanded at load time
pub const DEFAULT_CONFIG_PATH: &str = "~/.shortcut-drill/config.json";
