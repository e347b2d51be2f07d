//! Structured JSONL logging plus human-readable stderr output.
//!
//! - **JSONL to file** (~/.shortcut-drill/logs/shortcut-drill.jsonl) for tooling
//! - **Compact to stderr** for developers
//!
//! The library itself only emits `tracing` events; hosts decide whether to
//! install this subscriber or their own.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shortcut_drill::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init();
//!
//! tracing::info!(item_count = 42, "Dataset loaded");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-04-01T10:30:45.123Z","level":"INFO","target":"shortcut_drill::scheduler","fields":{"message":"Started training session","queue_len":14}}
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "shortcut-drill.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// If the log file cannot be opened, only stderr output is produced.
/// Calling this twice leaves the first subscriber in place.
pub fn init() -> LoggingGuard {
    let log_path = log_path();
    let writer: Box<dyn Write + Send> = match open_log_file(&log_path) {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file {}: {}", log_path.display(), e);
            Box::new(io::sink())
        }
    };

    // Non-blocking so a slow disk never stalls answer handling
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(writer);

    // Default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let pretty_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %log_path.display(),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

fn open_log_file(path: &std::path::Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Log directory (~/.shortcut-drill/logs/), or a temp dir without a home.
fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".shortcut-drill").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("shortcut-drill-logs"))
}

/// Path of the JSONL log file.
pub fn log_path() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}
