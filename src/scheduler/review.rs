//! Spaced-repetition update rule.
//!
//! Correct answers grow the interval 0 -> 1 -> 3 -> floor(interval * ease)
//! and nudge ease up; a wrong answer resets the interval to one day and
//! lowers ease. Ease stays within [`MIN_EASE`, `MAX_EASE`].

use chrono::{DateTime, Duration, Utc};

use crate::progress::{ProgressRecord, MAX_EASE, MIN_EASE};

/// Ease gained per correct answer
pub const EASE_BONUS: f64 = 0.05;
/// Ease lost per wrong answer
pub const EASE_PENALTY: f64 = 0.2;

/// Interval after a correct answer.
pub fn next_interval(interval_days: u32, ease: f64) -> u32 {
    match interval_days {
        0 => 1,
        1 => 3,
        // `as` saturates at u32::MAX
        n => (n as f64 * ease).floor() as u32,
    }
}

/// Apply one answer to a record.
pub fn apply_answer(
    record: &mut ProgressRecord,
    correct: bool,
    elapsed_ms: f64,
    now: DateTime<Utc>,
) {
    let elapsed_ms = if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    };

    record.attempts = record.attempts.saturating_add(1);
    if correct {
        record.correct = record.correct.saturating_add(1);
    }

    if record.attempts == 1 {
        record.avg_response_ms = elapsed_ms;
    } else {
        let previous = (record.attempts - 1) as f64;
        record.avg_response_ms =
            (record.avg_response_ms * previous + elapsed_ms) / record.attempts as f64;
    }

    if correct {
        record.correct_streak = record.correct_streak.saturating_add(1);
        record.interval_days = next_interval(record.interval_days, record.ease);
        record.ease = (record.ease + EASE_BONUS).min(MAX_EASE);
    } else {
        record.correct_streak = 0;
        record.interval_days = 1;
        record.ease = (record.ease - EASE_PENALTY).max(MIN_EASE);
    }

    record.due_at = due_after(now, record.interval_days);
}

/// `now + days`, pinned to the latest representable instant on overflow.
fn due_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
