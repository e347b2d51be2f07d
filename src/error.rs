use thiserror::Error;
use tracing::{error, warn};

use crate::dataset::DatasetError;
use crate::progress::PersistenceError;

/// Domain-specific errors for shortcut drills
#[derive(Error, Debug)]
pub enum DrillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Progress store error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DrillError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Could not access a file: {}", e),
            Self::Json(e) => format!("Invalid file format: {}", e),
            Self::Dataset(e) => format!("Could not load shortcuts: {}", e),
            Self::Persistence(_) => {
                "Progress could not be saved; continuing without saving".to_string()
            }
            Self::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrillError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and user doesn't need to know.
///
/// # Examples
///
/// ```
/// use shortcut_drill::error::ResultExt;
///
/// let parsed: Option<u32> = "not a number".parse::<u32>().warn_on_err();
/// assert!(parsed.is_none());
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
