//! Per-item mastery state and its persistence.
//!
//! The store format is a pretty-printed JSON array of records sorted by id.
//! Writes go to a temp file that is renamed over the target, so a crash
//! mid-write never leaves a torn store behind.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Ease assigned to a record the first time its item is seen
pub const INITIAL_EASE: f64 = 2.3;
/// Lower bound of the ease factor
pub const MIN_EASE: f64 = 1.3;
/// Upper bound of the ease factor
pub const MAX_EASE: f64 = 3.0;

/// Progress records keyed by item id.
pub type ProgressMap = HashMap<String, ProgressRecord>;

/// Mastery state for a single trainable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    /// Interval multiplier, kept within [`MIN_EASE`, `MAX_EASE`]
    pub ease: f64,
    pub interval_days: u32,
    pub due_at: DateTime<Utc>,
    pub correct_streak: u32,
    pub attempts: u32,
    /// Correct answers, never more than `attempts`
    pub correct: u32,
    #[serde(alias = "avgMs")]
    pub avg_response_ms: f64,
}

impl ProgressRecord {
    /// A fresh record, due immediately.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            ease: INITIAL_EASE,
            interval_days: 0,
            due_at: now,
            correct_streak: 0,
            attempts: 0,
            correct: 0,
            avg_response_ms: 0.0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }

    pub fn is_new(&self) -> bool {
        self.attempts == 0
    }

    /// Share of correct answers; 0 when never attempted.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.correct as f64 / self.attempts as f64
    }

    /// Bring a stored record back within its invariants: ease inside
    /// [`MIN_EASE`, `MAX_EASE`], `correct <= attempts`, and a finite,
    /// non-negative average. Returns true if anything changed.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();

        self.ease = if self.ease.is_finite() {
            self.ease.clamp(MIN_EASE, MAX_EASE)
        } else {
            INITIAL_EASE
        };
        self.correct = self.correct.min(self.attempts);
        if !self.avg_response_ms.is_finite() || self.avg_response_ms < 0.0 {
            self.avg_response_ms = 0.0;
        }

        *self != before
    }
}

/// Error that can occur when loading/saving progress.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("progress store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable storage for the full progress map.
pub trait ProgressStore {
    /// Load every stored record. A store that does not exist yet is empty.
    fn load(&mut self) -> Result<ProgressMap, PersistenceError>;
    /// Replace the stored records with `progress`.
    fn save(&mut self, progress: &ProgressMap) -> Result<(), PersistenceError>;
}

/// Progress store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    #[instrument(name = "progress_load", skip(self), fields(path = %self.path.display()))]
    fn load(&mut self) -> Result<ProgressMap, PersistenceError> {
        if !self.path.exists() {
            info!("Progress file not found, starting fresh");
            return Ok(ProgressMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let records: Vec<ProgressRecord> = serde_json::from_str(&content)?;
        let progress: ProgressMap = records
            .into_iter()
            .map(|mut record| {
                let original = record.clone();
                if record.repair() {
                    warn!(
                        item_id = %record.id,
                        ease = original.ease,
                        correct = original.correct,
                        attempts = original.attempts,
                        "Repaired out-of-range progress record"
                    );
                }
                (record.id.clone(), record)
            })
            .collect();

        info!(entry_count = progress.len(), "Loaded progress");
        Ok(progress)
    }

    #[instrument(name = "progress_save", skip(self, progress), fields(path = %self.path.display()))]
    fn save(&mut self, progress: &ProgressMap) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut records: Vec<&ProgressRecord> = progress.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        let json = serde_json::to_string_pretty(&records)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(
            entry_count = records.len(),
            bytes = json.len(),
            "Saved progress (atomic)"
        );
        Ok(())
    }
}

/// In-memory progress store, for hosts without durable storage and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    records: ProgressMap,
    save_count: usize,
    fail: bool,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with previously stored records.
    pub fn with_records(records: impl IntoIterator<Item = ProgressRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            ..Self::default()
        }
    }

    /// A store whose loads and saves always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &ProgressMap {
        &self.records
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    fn unavailable() -> PersistenceError {
        PersistenceError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "progress store unavailable",
        ))
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&mut self) -> Result<ProgressMap, PersistenceError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self.records.clone())
    }

    fn save(&mut self, progress: &ProgressMap) -> Result<(), PersistenceError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        self.records = progress.clone();
        self.save_count += 1;
        Ok(())
    }
}

/// Default progress file location (~/.shortcut-drill/progress.json).
pub fn default_progress_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".shortcut-drill")
        .join("progress.json")
}
