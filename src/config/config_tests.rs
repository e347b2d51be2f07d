use super::*;
use crate::error::DrillError;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = DrillConfig::default();
    assert_eq!(config.session.due_limit, DEFAULT_DUE_LIMIT);
    assert_eq!(config.session.new_limit, DEFAULT_NEW_LIMIT);
    assert_eq!(config.session.fallback_limit, DEFAULT_FALLBACK_LIMIT);
    assert_eq!(config.mastery.min_interval_days, 30);
    assert_eq!(config.mastery.min_streak, 3);
    assert_eq!(config.feedback_delay(), Duration::from_millis(250));
    assert_eq!(config.progress_file, None);
}

#[test]
fn test_empty_json_uses_defaults() {
    let config: DrillConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DrillConfig::default());
}

#[test]
fn test_partial_session_config() {
    let json = r#"{"session": {"newLimit": 5}, "feedbackDelayMs": 0}"#;
    let config: DrillConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.session.new_limit, 5);
    assert_eq!(config.session.due_limit, DEFAULT_DUE_LIMIT);
    assert_eq!(config.feedback_delay_ms, 0);
}

#[test]
fn test_config_serialization() {
    let config = DrillConfig {
        session: SessionConfig {
            due_limit: 12,
            new_limit: 4,
            fallback_limit: 8,
        },
        mastery: MasteryConfig {
            min_interval_days: 21,
            min_streak: 2,
        },
        feedback_delay_ms: 400,
        progress_file: Some("/tmp/progress.json".to_string()),
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("dueLimit"));
    assert!(json.contains("minIntervalDays"));
    let deserialized: DrillConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_progress_path_resolution() {
    let config = DrillConfig {
        progress_file: Some("/var/tmp/drill.json".to_string()),
        ..DrillConfig::default()
    };
    assert_eq!(
        config.progress_path(),
        std::path::PathBuf::from("/var/tmp/drill.json")
    );

    let default_path = DrillConfig::default().progress_path();
    assert!(default_path.ends_with(".shortcut-drill/progress.json"));
}

#[test]
fn test_read_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"mastery": {"minStreak": 5}}"#).unwrap();

    let config = read_config(&path).unwrap();
    assert_eq!(config.mastery.min_streak, 5);
    assert_eq!(config.mastery.min_interval_days, DEFAULT_MASTERY_MIN_INTERVAL_DAYS);
}

#[test]
fn test_read_config_errors() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(read_config(&missing), Err(DrillError::Io(_))));

    let malformed = dir.path().join("malformed.json");
    std::fs::write(&malformed, "{ session: ").unwrap();
    assert!(matches!(read_config(&malformed), Err(DrillError::Json(_))));

    let empty_sessions = dir.path().join("zero.json");
    std::fs::write(
        &empty_sessions,
        r#"{"session": {"dueLimit": 0, "newLimit": 0, "fallbackLimit": 0}}"#,
    )
    .unwrap();
    assert!(matches!(
        read_config(&empty_sessions),
        Err(DrillError::Config(_))
    ));
}
