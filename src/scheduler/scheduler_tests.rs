use super::*;
use crate::progress::{JsonProgressStore, MemoryProgressStore};
use crate::shortcuts::{KeyCombination, Modifiers};
use chrono::{Duration, TimeZone};
use std::collections::HashSet;
use tempfile::tempdir;

type TestEngine = SchedulingEngine<MemoryProgressStore, ManualClock, StdRng>;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
}

fn item(id: &str, keys: &str) -> ShortcutItem {
    ShortcutItem::new(id, format!("Action {id}"), keys, "Test")
}

fn sample_items() -> Vec<ShortcutItem> {
    vec![
        item("save", "Cmd S"),
        item("undo", "Cmd Z"),
        item("drag", "Click and drag"),
        item("nav", "arrow keys"),
        item("redo", "Cmd Shift Z"),
    ]
}

fn record(
    id: &str,
    attempts: u32,
    correct: u32,
    interval_days: u32,
    streak: u32,
    due_in_days: i64,
) -> ProgressRecord {
    ProgressRecord {
        id: id.to_string(),
        ease: 2.3,
        interval_days,
        due_at: start() + Duration::days(due_in_days),
        correct_streak: streak,
        attempts,
        correct,
        avg_response_ms: 500.0,
    }
}

fn engine_with(
    items: Vec<ShortcutItem>,
    store: MemoryProgressStore,
    config: &DrillConfig,
) -> (TestEngine, ManualClock) {
    let clock = ManualClock::new(start());
    let engine =
        SchedulingEngine::with_parts(items, store, clock.clone(), StdRng::seed_from_u64(7), config);
    (engine, clock)
}

fn sample_engine() -> (TestEngine, ManualClock) {
    engine_with(sample_items(), MemoryProgressStore::new(), &DrillConfig::default())
}

fn correct_keystroke(engine: &TestEngine) -> Keystroke {
    match engine.current_alternatives().and_then(|a| a.iter().next()) {
        Some(KeyCombination::Keys(stroke)) => stroke.clone(),
        Some(KeyCombination::AnyArrow) => Keystroke::plain("Left"),
        None => panic!("no current item"),
    }
}

fn wrong_keystroke() -> Keystroke {
    Keystroke::new("F19", Modifiers::control())
}

fn ids(items: Vec<&ShortcutItem>) -> Vec<String> {
    items.into_iter().map(|i| i.id.clone()).collect()
}

fn id_set(items: Vec<&ShortcutItem>) -> HashSet<String> {
    items.into_iter().map(|i| i.id.clone()).collect()
}

fn set_of(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// ----------------------------------------------------------------------
// Construction
// ----------------------------------------------------------------------

#[test]
fn test_new_engine_creates_records_for_trainable_items_only() {
    let (engine, _clock) = sample_engine();

    assert_eq!(engine.progress().len(), 4);
    assert!(engine.progress_for("drag").is_none());
    assert_eq!(engine.store().save_count(), 1);
    assert_eq!(engine.session_state(), SessionState::NotStarted);

    let fresh = engine.progress_for("save").unwrap();
    assert_eq!(fresh.ease, 2.3);
    assert_eq!(fresh.interval_days, 0);
    assert_eq!(fresh.due_at, start());
    assert_eq!(fresh.attempts, 0);
    assert_eq!(fresh.correct, 0);
    assert_eq!(fresh.correct_streak, 0);
    assert_eq!(fresh.avg_response_ms, 0.0);
}

#[test]
fn test_trainable_items_excludes_mouse_gestures() {
    let (engine, _clock) = sample_engine();
    assert_eq!(ids(engine.trainable_items()), vec!["save", "undo", "nav", "redo"]);
}

#[test]
fn test_existing_records_are_kept() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 3, 2, 3, 1, 2),
        record("gone", 9, 9, 40, 9, 10),
    ]);
    let (engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());

    assert_eq!(engine.progress_for("save").unwrap().attempts, 3);
    // Records of items that left the dataset are not deleted
    assert!(engine.progress_for("gone").is_some());
    assert_eq!(engine.progress().len(), 5);
}

#[test]
fn test_no_save_when_nothing_created() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 0, 0, 0, 0, 0),
        record("undo", 0, 0, 0, 0, 0),
        record("nav", 0, 0, 0, 0, 0),
        record("redo", 0, 0, 0, 0, 0),
    ]);
    let (engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());
    assert_eq!(engine.store().save_count(), 0);
}

#[test]
fn test_failing_store_degrades_to_memory() {
    let (mut engine, _clock) = engine_with(
        sample_items(),
        MemoryProgressStore::failing(),
        &DrillConfig::default(),
    );
    assert_eq!(engine.progress().len(), 4);

    engine.start_session();
    let id = engine.current_item().unwrap().id.clone();
    let stroke = correct_keystroke(&engine);
    let feedback = engine.submit_answer(&stroke, 250.0).unwrap();

    assert!(feedback.correct);
    assert_eq!(engine.progress_for(&id).unwrap().attempts, 1);
}

#[test]
fn test_default_constructor_uses_system_clock() {
    let mut engine =
        SchedulingEngine::new(sample_items(), MemoryProgressStore::new(), &DrillConfig::default());
    engine.start_session();
    assert_eq!(engine.queue().len(), 4);
    assert!(engine.session_started_at().is_some());
}

// ----------------------------------------------------------------------
// Due and new items
// ----------------------------------------------------------------------

#[test]
fn test_due_items_sorted_oldest_first_with_id_tie_break() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 2, 1, 1, 0, -2),
        record("undo", 2, 1, 1, 0, -1),
        record("nav", 2, 1, 3, 1, 3),
        record("redo", 2, 1, 1, 0, -2),
    ]);
    let (engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());

    assert_eq!(ids(engine.due_items(10)), vec!["redo", "save", "undo"]);
    assert_eq!(ids(engine.due_items(2)), vec!["redo", "save"]);
    assert!(engine.due_items(0).is_empty());

    let due = engine.due_items(10);
    let times: Vec<_> = due
        .iter()
        .map(|i| engine.progress_for(&i.id).unwrap().due_at)
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_due_items_follow_the_clock() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 1, 1, 1, 1, 1),
        record("undo", 1, 1, 3, 2, 3),
        record("nav", 1, 1, 3, 2, 3),
        record("redo", 1, 1, 7, 3, 7),
    ]);
    let (engine, clock) = engine_with(sample_items(), store, &DrillConfig::default());

    assert!(engine.due_items(10).is_empty());
    clock.advance(Duration::days(1));
    assert_eq!(ids(engine.due_items(10)), vec!["save"]);
    clock.advance(Duration::days(2));
    assert_eq!(ids(engine.due_items(10)), vec!["save", "nav", "undo"]);
}

#[test]
fn test_new_items_are_unattempted_and_limited() {
    let store = MemoryProgressStore::with_records(vec![record("save", 1, 1, 1, 1, 1)]);
    let (mut engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());

    assert_eq!(id_set(engine.new_items(10)), set_of(&["undo", "nav", "redo"]));

    let two = id_set(engine.new_items(2));
    assert_eq!(two.len(), 2);
    assert!(two.is_subset(&set_of(&["undo", "nav", "redo"])));

    assert!(engine.new_items(0).is_empty());
}

// ----------------------------------------------------------------------
// Session composition
// ----------------------------------------------------------------------

#[test]
fn test_start_session_queues_due_then_new_without_duplicates() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 2, 1, 1, 0, -1),
        record("undo", 2, 2, 3, 2, 2),
    ]);
    let (mut engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());
    engine.start_session();

    let queued: Vec<String> = engine
        .queue()
        .items()
        .iter()
        .map(|&i| engine.catalog().entry(i).unwrap().item.id.clone())
        .collect();

    // save is overdue, nav and redo are new and due immediately
    assert_eq!(queued[0], "save");
    assert_eq!(queued.len(), 3);
    assert_eq!(
        queued.iter().cloned().collect::<HashSet<_>>(),
        set_of(&["save", "nav", "redo"])
    );
    assert_eq!(engine.session_state(), SessionState::Active);
    assert_eq!(engine.queue().cursor(), 0);
}

#[test]
fn test_start_session_respects_limits() {
    let items: Vec<ShortcutItem> = (0..60)
        .map(|n| item(&format!("item-{n:02}"), "Cmd K"))
        .collect();
    let (mut engine, _clock) =
        engine_with(items, MemoryProgressStore::new(), &DrillConfig::default());
    engine.start_session();

    let queue = engine.queue();
    assert!(queue.len() >= 30 && queue.len() <= 40, "len {}", queue.len());
    let unique: HashSet<_> = queue.items().iter().collect();
    assert_eq!(unique.len(), queue.len());
}

#[test]
fn test_start_session_falls_back_to_random_review() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 1, 1, 5, 1, 5),
        record("undo", 1, 1, 5, 1, 5),
        record("nav", 1, 1, 5, 1, 5),
        record("redo", 1, 1, 5, 1, 5),
    ]);
    let (mut engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());
    assert!(engine.due_items(30).is_empty());

    engine.start_session();
    let queued: HashSet<usize> = engine.queue().items().iter().copied().collect();
    let trainable: HashSet<usize> = engine.catalog().trainable_indices().iter().copied().collect();
    assert_eq!(queued, trainable);
    assert_eq!(engine.session_state(), SessionState::Active);
}

#[test]
fn test_fallback_review_is_limited() {
    let mut config = DrillConfig::default();
    config.session.fallback_limit = 2;
    let store = MemoryProgressStore::with_records(vec![
        record("save", 1, 1, 5, 1, 5),
        record("undo", 1, 1, 5, 1, 5),
        record("nav", 1, 1, 5, 1, 5),
        record("redo", 1, 1, 5, 1, 5),
    ]);
    let (mut engine, _clock) = engine_with(sample_items(), store, &config);

    engine.start_session();
    assert_eq!(engine.queue().len(), 2);
}

#[test]
fn test_start_session_without_trainable_items_is_empty() {
    let items = vec![item("drag", "Click and drag"), item("scroll", "Scroll wheel")];
    let (mut engine, _clock) =
        engine_with(items, MemoryProgressStore::new(), &DrillConfig::default());

    engine.start_session();
    assert!(engine.queue().is_empty());
    assert_eq!(engine.session_state(), SessionState::Complete);
    assert!(engine.current_item().is_none());
    assert!(engine.submit_answer(&Keystroke::plain("A"), 100.0).is_none());
    assert_eq!(engine.store().save_count(), 0);
}

// ----------------------------------------------------------------------
// Answers
// ----------------------------------------------------------------------

#[test]
fn test_correct_answer_updates_record_and_advances() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();
    let saves_before = engine.store().save_count();

    let id = engine.current_item().unwrap().id.clone();
    let stroke = correct_keystroke(&engine);
    let feedback = engine.submit_answer(&stroke, 640.0).unwrap();

    assert!(feedback.correct);
    assert_eq!(feedback.item_id, id);
    assert_eq!(engine.last_feedback(), Some(&feedback));

    let updated = engine.progress_for(&id).unwrap();
    assert_eq!(updated.attempts, 1);
    assert_eq!(updated.correct, 1);
    assert_eq!(updated.correct_streak, 1);
    assert_eq!(updated.interval_days, 1);
    assert_eq!(updated.avg_response_ms, 640.0);
    assert_eq!(updated.due_at, start() + Duration::days(1));

    assert_eq!(engine.queue().cursor(), 1);
    assert_eq!(engine.store().save_count(), saves_before + 1);
    assert_eq!(engine.store().records().get(&id), Some(updated));
}

#[test]
fn test_incorrect_answer_resets_interval_and_streak() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 6, 6, 40, 6, -1),
        record("undo", 1, 1, 5, 1, 5),
        record("nav", 1, 1, 5, 1, 5),
        record("redo", 1, 1, 5, 1, 5),
    ]);
    let (mut engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());
    engine.start_session();
    assert_eq!(engine.current_item().unwrap().id, "save");

    let feedback = engine.submit_answer(&wrong_keystroke(), 900.0).unwrap();
    assert!(!feedback.correct);
    assert_eq!(feedback.expected, "Cmd + S");
    assert_eq!(feedback.received, "Ctrl + F19");

    let updated = engine.progress_for("save").unwrap();
    assert_eq!(updated.interval_days, 1);
    assert_eq!(updated.correct_streak, 0);
    assert_eq!(updated.attempts, 7);
    assert_eq!(updated.correct, 6);
    assert!((updated.ease - 2.1).abs() < 1e-9);
}

#[test]
fn test_interval_progression_across_sessions() {
    let (mut engine, clock) = engine_with(
        vec![item("save", "Cmd S")],
        MemoryProgressStore::new(),
        &DrillConfig::default(),
    );
    let save = Keystroke::new("S", Modifiers::command());

    engine.start_session();
    engine.submit_answer(&save, 100.0).unwrap();
    assert_eq!(engine.progress_for("save").unwrap().interval_days, 1);

    clock.advance(Duration::days(1));
    engine.start_session();
    engine.submit_answer(&save, 100.0).unwrap();
    assert_eq!(engine.progress_for("save").unwrap().interval_days, 3);

    clock.advance(Duration::days(3));
    engine.start_session();
    let ease_before = engine.progress_for("save").unwrap().ease;
    engine.submit_answer(&save, 100.0).unwrap();

    let record = engine.progress_for("save").unwrap();
    assert_eq!(record.interval_days, (3.0 * ease_before).floor() as u32);
    assert_eq!(record.correct_streak, 3);
    assert_eq!(record.due_at, clock.now() + Duration::days(record.interval_days as i64));
}

#[test]
fn test_any_arrow_item_accepts_unmodified_arrows() {
    let (mut engine, _clock) = engine_with(
        vec![item("nav", "arrow keys")],
        MemoryProgressStore::new(),
        &DrillConfig::default(),
    );
    engine.start_session();
    let feedback = engine
        .submit_answer(&Keystroke::new("Left", Modifiers::command()), 100.0)
        .unwrap();
    assert!(!feedback.correct);

    engine.start_session();
    let feedback = engine.submit_answer(&Keystroke::captured("down", Modifiers::default()), 100.0);
    assert!(feedback.unwrap().correct);
}

#[test]
fn test_session_completes_and_ignores_further_answers() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();
    let len = engine.queue().len();

    for _ in 0..len {
        let stroke = correct_keystroke(&engine);
        assert!(engine.submit_answer(&stroke, 100.0).is_some());
    }

    assert_eq!(engine.session_state(), SessionState::Complete);
    assert_eq!(engine.queue().cursor(), len);
    let saves = engine.store().save_count();
    assert!(engine.submit_answer(&Keystroke::plain("S"), 100.0).is_none());
    assert!(!engine.skip_current());
    assert_eq!(engine.store().save_count(), saves);
    assert_eq!(engine.accuracy(), 1.0);
}

#[test]
fn test_restart_after_complete_reenters_active() {
    let (mut engine, _clock) = engine_with(
        vec![item("save", "Cmd S")],
        MemoryProgressStore::new(),
        &DrillConfig::default(),
    );
    engine.start_session();
    engine.submit_answer(&wrong_keystroke(), 100.0).unwrap();
    assert_eq!(engine.session_state(), SessionState::Complete);
    assert!(engine.last_feedback().is_some());

    engine.restart_session();
    assert_eq!(engine.session_state(), SessionState::Active);
    assert!(engine.last_feedback().is_none());
}

#[test]
fn test_skip_current_does_not_score() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();
    let saves = engine.store().save_count();
    let id = engine.current_item().unwrap().id.clone();

    assert!(engine.skip_current());
    assert_eq!(engine.queue().cursor(), 1);
    assert_eq!(engine.progress_for(&id).unwrap().attempts, 0);
    assert_eq!(engine.store().save_count(), saves);
}

#[test]
fn test_submit_answer_for_stale_item_is_ignored() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();
    let current = engine.current_item().unwrap().id.clone();
    let stale = if current == "save" { "undo" } else { "save" };

    assert!(engine
        .submit_answer_for(stale, &Keystroke::plain("S"), 100.0)
        .is_none());
    assert_eq!(engine.queue().cursor(), 0);

    let stroke = correct_keystroke(&engine);
    assert!(engine.submit_answer_for(&current, &stroke, 100.0).is_some());
    assert_eq!(engine.queue().cursor(), 1);
}

// ----------------------------------------------------------------------
// Stats
// ----------------------------------------------------------------------

#[test]
fn test_accuracy_without_attempts_is_zero() {
    let (engine, _clock) = sample_engine();
    assert_eq!(engine.total_attempts(), 0);
    assert_eq!(engine.accuracy(), 0.0);

    let (engine, _clock) =
        engine_with(Vec::new(), MemoryProgressStore::new(), &DrillConfig::default());
    assert_eq!(engine.accuracy(), 0.0);
}

#[test]
fn test_accuracy_across_records() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();

    let stroke = correct_keystroke(&engine);
    engine.submit_answer(&stroke, 100.0).unwrap();
    engine.submit_answer(&wrong_keystroke(), 100.0).unwrap();

    assert_eq!(engine.total_attempts(), 2);
    assert_eq!(engine.accuracy(), 0.5);
}

#[test]
fn test_mastered_count_uses_interval_and_streak() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 5, 5, 30, 3, 30),
        record("undo", 5, 5, 29, 3, 29),
        record("nav", 5, 5, 30, 2, 30),
        record("redo", 9, 8, 75, 6, 75),
    ]);
    let (engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());
    assert_eq!(engine.mastered_count(), 2);
}

#[test]
fn test_weakest_orders_by_accuracy() {
    let store = MemoryProgressStore::with_records(vec![
        record("save", 1, 1, 1, 1, 1),
        record("undo", 2, 0, 1, 0, 1),
        record("redo", 2, 1, 1, 0, 1),
    ]);
    let (engine, _clock) = engine_with(sample_items(), store, &DrillConfig::default());

    assert_eq!(ids(engine.weakest(3)), vec!["undo", "drag", "nav"]);
    assert_eq!(
        ids(engine.weakest(10)),
        vec!["undo", "drag", "nav", "redo", "save"]
    );
}

// ----------------------------------------------------------------------
// Dataset changes and persistence
// ----------------------------------------------------------------------

#[test]
fn test_replace_dataset_resets_session_and_creates_records() {
    let (mut engine, _clock) = sample_engine();
    engine.start_session();

    let mut items = sample_items();
    items.push(item("loop", "Cmd L"));
    engine.replace_dataset(items);

    assert_eq!(engine.session_state(), SessionState::NotStarted);
    assert!(engine.session_started_at().is_none());
    assert!(engine.progress_for("loop").is_some());
    assert_eq!(engine.trainable_items().len(), 5);
}

#[test]
fn test_progress_round_trips_through_json_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.json");
    let clock = ManualClock::new(start());

    let mut engine = SchedulingEngine::with_parts(
        sample_items(),
        JsonProgressStore::new(&path),
        clock.clone(),
        StdRng::seed_from_u64(11),
        &DrillConfig::default(),
    );
    engine.start_session();
    for ms in [320.0, 410.5, 1290.25] {
        let stroke = match engine.current_alternatives().and_then(|a| a.iter().next()) {
            Some(KeyCombination::Keys(stroke)) => stroke.clone(),
            _ => Keystroke::plain("Up"),
        };
        engine.submit_answer(&stroke, ms).unwrap();
        clock.advance(Duration::milliseconds(1337));
    }

    let mut reloaded = JsonProgressStore::new(&path);
    assert_eq!(&reloaded.load().unwrap(), engine.progress());
}
