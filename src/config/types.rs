//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::error::{DrillError, Result};
use crate::progress::default_progress_path;

// ============================================
// SESSION CONFIG
// ============================================

/// How a training session queue is composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Maximum number of due items at the front of the queue (default: 30)
    #[serde(default = "default_due_limit")]
    pub due_limit: usize,
    /// Maximum number of never-attempted items appended after the due ones (default: 10)
    #[serde(default = "default_new_limit")]
    pub new_limit: usize,
    /// Size of the random review used when nothing is due or new (default: 30)
    #[serde(default = "default_fallback_limit")]
    pub fallback_limit: usize,
}

fn default_due_limit() -> usize {
    DEFAULT_DUE_LIMIT
}
fn default_new_limit() -> usize {
    DEFAULT_NEW_LIMIT
}
fn default_fallback_limit() -> usize {
    DEFAULT_FALLBACK_LIMIT
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            due_limit: DEFAULT_DUE_LIMIT,
            new_limit: DEFAULT_NEW_LIMIT,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }
}

// ============================================
// MASTERY CONFIG
// ============================================

/// Thresholds for counting an item as mastered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryConfig {
    /// Minimum review interval in days (default: 30)
    #[serde(default = "default_mastery_min_interval_days")]
    pub min_interval_days: u32,
    /// Minimum run of consecutive correct answers (default: 3)
    #[serde(default = "default_mastery_min_streak")]
    pub min_streak: u32,
}

fn default_mastery_min_interval_days() -> u32 {
    DEFAULT_MASTERY_MIN_INTERVAL_DAYS
}
fn default_mastery_min_streak() -> u32 {
    DEFAULT_MASTERY_MIN_STREAK
}

impl Default for MasteryConfig {
    fn default() -> Self {
        MasteryConfig {
            min_interval_days: DEFAULT_MASTERY_MIN_INTERVAL_DAYS,
            min_streak: DEFAULT_MASTERY_MIN_STREAK,
        }
    }
}

// ============================================
// DRILL CONFIG
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub mastery: MasteryConfig,
    /// Delay between recording an answer and presenting the next item (default: 250)
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    /// Progress store location (default: ~/.shortcut-drill/progress.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_file: Option<String>,
}

fn default_feedback_delay_ms() -> u64 {
    DEFAULT_FEEDBACK_DELAY_MS
}

impl Default for DrillConfig {
    fn default() -> Self {
        DrillConfig {
            session: SessionConfig::default(),
            mastery: MasteryConfig::default(),
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
            progress_file: None,
        }
    }
}

impl DrillConfig {
    /// Reject settings that would make every session empty.
    pub fn validate(&self) -> Result<()> {
        let s = &self.session;
        if s.due_limit == 0 && s.new_limit == 0 && s.fallback_limit == 0 {
            return Err(DrillError::Config(
                "session limits are all zero; sessions would always be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    /// Resolved progress store path, with `~` expanded.
    pub fn progress_path(&self) -> PathBuf {
        match &self.progress_file {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => default_progress_path(),
        }
    }
}
