//! Spaced-repetition scheduling engine.
//!
//! The engine owns the progress map and the session queue. It is
//! constructed explicitly and handed to the host UI; nothing here is global.
//!
//! # Flow
//!
//! 1. `SchedulingEngine::new` loads stored progress (failures degrade to an
//!    empty map) and creates records for trainable items seen for the first time
//! 2. `start_session` queues due items (oldest first), then new items in
//!    random order, or a random review when neither exists
//! 3. `submit_answer` scores the current item, applies the update rule,
//!    advances the cursor and saves progress
//!
//! Persistence failures are logged and the engine keeps working in memory.

mod clock;
pub mod review;
mod session;

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use crate::catalog::{CatalogEntry, ShortcutCatalog};
use crate::config::{DrillConfig, MasteryConfig, SessionConfig};
use crate::dataset::ShortcutItem;
use crate::error::ResultExt;
use crate::evaluator::{evaluate, AnswerFeedback};
use crate::progress::{ProgressMap, ProgressRecord, ProgressStore};
use crate::shortcuts::{Keystroke, ParsedAlternatives};

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{SessionQueue, SessionState};

pub struct SchedulingEngine<S, C = SystemClock, R = StdRng> {
    catalog: ShortcutCatalog,
    progress: ProgressMap,
    queue: SessionQueue,
    store: S,
    clock: C,
    rng: R,
    session_config: SessionConfig,
    mastery: MasteryConfig,
    last_feedback: Option<AnswerFeedback>,
    session_started_at: Option<DateTime<Utc>>,
}

impl<S: ProgressStore> SchedulingEngine<S> {
    /// Engine on wall-clock time with an entropy-seeded random source.
    pub fn new(items: Vec<ShortcutItem>, store: S, config: &DrillConfig) -> Self {
        Self::with_parts(items, store, SystemClock, StdRng::from_entropy(), config)
    }
}

impl<S: ProgressStore, C: Clock, R: Rng> SchedulingEngine<S, C, R> {
    pub fn with_parts(
        items: Vec<ShortcutItem>,
        mut store: S,
        clock: C,
        rng: R,
        config: &DrillConfig,
    ) -> Self {
        let progress = store.load().warn_on_err().unwrap_or_default();

        let mut engine = Self {
            catalog: ShortcutCatalog::new(items),
            progress,
            queue: SessionQueue::default(),
            store,
            clock,
            rng,
            session_config: config.session,
            mastery: config.mastery,
            last_feedback: None,
            session_started_at: None,
        };
        engine.ensure_progress();
        engine
    }

    // ------------------------------------------------------------------
    // Dataset
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &ShortcutCatalog {
        &self.catalog
    }

    /// Items whose description parses to at least one key combination.
    pub fn trainable_items(&self) -> Vec<&ShortcutItem> {
        self.catalog.trainable().collect()
    }

    /// Swap in a new dataset. The session returns to `NotStarted`;
    /// records of items that disappeared are kept.
    pub fn replace_dataset(&mut self, items: Vec<ShortcutItem>) {
        self.catalog = ShortcutCatalog::new(items);
        self.queue = SessionQueue::default();
        self.last_feedback = None;
        self.session_started_at = None;
        self.ensure_progress();
    }

    /// Create records for trainable items that have none yet, saving if any
    /// were created. Returns the number created.
    pub fn ensure_progress(&mut self) -> usize {
        let now = self.clock.now();
        let mut created = 0;

        for item in self.catalog.trainable() {
            if !self.progress.contains_key(&item.id) {
                self.progress
                    .insert(item.id.clone(), ProgressRecord::new(item.id.clone(), now));
                created += 1;
            }
        }

        if created > 0 {
            debug!(created = created, "Created progress records for new items");
            self.persist();
        }
        created
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Trainable items due now, oldest due first (ties by id), at most `limit`.
    pub fn due_items(&self, limit: usize) -> Vec<&ShortcutItem> {
        self.due_indices(limit)
            .into_iter()
            .filter_map(|i| self.catalog.entry(i).map(|e| &e.item))
            .collect()
    }

    /// Up to `limit` never-attempted trainable items in random order.
    pub fn new_items(&mut self, limit: usize) -> Vec<&ShortcutItem> {
        let indices = self.new_indices(limit);
        indices
            .into_iter()
            .filter_map(|i| self.catalog.entry(i).map(|e| &e.item))
            .collect()
    }

    fn due_indices(&self, limit: usize) -> Vec<usize> {
        let now = self.clock.now();
        let mut due: Vec<(usize, &ProgressRecord)> = self
            .catalog
            .trainable_indices()
            .iter()
            .filter_map(|&i| {
                let entry = self.catalog.entry(i)?;
                let record = self.progress.get(&entry.item.id)?;
                record.is_due(now).then_some((i, record))
            })
            .collect();

        due.sort_by(|(_, a), (_, b)| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().take(limit).map(|(i, _)| i).collect()
    }

    fn new_indices(&mut self, limit: usize) -> Vec<usize> {
        let catalog = &self.catalog;
        let progress = &self.progress;
        let mut fresh: Vec<usize> = catalog
            .trainable_indices()
            .iter()
            .copied()
            .filter(|&i| {
                catalog
                    .entry(i)
                    .and_then(|e| progress.get(&e.item.id))
                    .is_some_and(ProgressRecord::is_new)
            })
            .collect();

        fresh.shuffle(&mut self.rng);
        fresh.truncate(limit);
        fresh
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Build a fresh queue and put the cursor on its first item.
    #[instrument(name = "start_session", skip(self))]
    pub fn start_session(&mut self) {
        let config = self.session_config;

        let due = self.due_indices(config.due_limit);
        let due_set: HashSet<usize> = due.iter().copied().collect();
        let fresh = self.new_indices(config.new_limit);
        let fresh_count = fresh.len();

        let mut items = due;
        items.extend(fresh.into_iter().filter(|i| !due_set.contains(i)));

        if items.is_empty() {
            let mut review = self.catalog.trainable_indices().to_vec();
            review.shuffle(&mut self.rng);
            review.truncate(config.fallback_limit);
            items = review;
        }

        info!(
            queue_len = items.len(),
            due_count = due_set.len(),
            new_count = fresh_count,
            "Started training session"
        );

        self.queue = SessionQueue::start(items);
        self.last_feedback = None;
        self.session_started_at = Some(self.clock.now());
    }

    pub fn restart_session(&mut self) {
        self.start_session();
    }

    pub fn current_item(&self) -> Option<&ShortcutItem> {
        self.current_entry().map(|e| &e.item)
    }

    /// Accepted answers for the current item.
    pub fn current_alternatives(&self) -> Option<&ParsedAlternatives> {
        self.current_entry().map(|e| &e.alternatives)
    }

    fn current_entry(&self) -> Option<&CatalogEntry> {
        self.queue.current().and_then(|i| self.catalog.entry(i))
    }

    /// Score `captured` against the current item, update its record, advance
    /// the cursor and save.
    ///
    /// A no-op returning `None` when the cursor is out of range or the record
    /// is missing.
    pub fn submit_answer(
        &mut self,
        captured: &Keystroke,
        elapsed_ms: f64,
    ) -> Option<AnswerFeedback> {
        let now = self.clock.now();
        let index = self.queue.current()?;
        let entry = self.catalog.entry(index)?;
        let Some(record) = self.progress.get_mut(&entry.item.id) else {
            debug!(
                item_id = %entry.item.id,
                "No progress record for current item, ignoring answer"
            );
            return None;
        };

        let feedback = evaluate(&entry.item.id, captured, &entry.alternatives);
        review::apply_answer(record, feedback.correct, elapsed_ms, now);

        debug!(
            item_id = %entry.item.id,
            correct = feedback.correct,
            interval_days = record.interval_days,
            ease = record.ease,
            "Recorded answer"
        );

        self.queue.advance();
        self.persist();
        self.last_feedback = Some(feedback.clone());
        Some(feedback)
    }

    /// Like [`submit_answer`](Self::submit_answer), but only if `item_id` is
    /// still the current item. Answers from a stale view are ignored.
    pub fn submit_answer_for(
        &mut self,
        item_id: &str,
        captured: &Keystroke,
        elapsed_ms: f64,
    ) -> Option<AnswerFeedback> {
        if self.current_item().map(|item| item.id.as_str()) != Some(item_id) {
            debug!(item_id = item_id, "Answer for an item that is not current, ignoring");
            return None;
        }
        self.submit_answer(captured, elapsed_ms)
    }

    /// Move past the current item without scoring it.
    pub fn skip_current(&mut self) -> bool {
        if self.queue.current().is_none() {
            return false;
        }
        self.queue.advance();
        true
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn session_state(&self) -> SessionState {
        self.queue.state()
    }

    pub fn last_feedback(&self) -> Option<&AnswerFeedback> {
        self.last_feedback.as_ref()
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session_started_at
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn progress_for(&self, id: &str) -> Option<&ProgressRecord> {
        self.progress.get(id)
    }

    /// Share of correct answers over all records; 0 when nothing was attempted.
    pub fn accuracy(&self) -> f64 {
        let attempts = self.total_attempts();
        if attempts == 0 {
            return 0.0;
        }
        let correct: u64 = self.progress.values().map(|r| u64::from(r.correct)).sum();
        correct as f64 / attempts as f64
    }

    pub fn total_attempts(&self) -> u64 {
        self.progress.values().map(|r| u64::from(r.attempts)).sum()
    }

    /// Records with a long interval and a run of correct answers.
    pub fn mastered_count(&self) -> usize {
        self.progress
            .values()
            .filter(|r| {
                r.interval_days >= self.mastery.min_interval_days
                    && r.correct_streak >= self.mastery.min_streak
            })
            .count()
    }

    /// Up to `n` items with the lowest accuracy, in dataset order on ties.
    pub fn weakest(&self, n: usize) -> Vec<&ShortcutItem> {
        let mut scored: Vec<(&ShortcutItem, f64)> = self
            .catalog
            .items()
            .map(|item| {
                let accuracy = self.progress.get(&item.id).map_or(0.0, ProgressRecord::accuracy);
                (item, accuracy)
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.into_iter().take(n).map(|(item, _)| item).collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        self.store.save(&self.progress).warn_on_err();
    }
}
