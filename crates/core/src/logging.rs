//! Process-wide `tracing` setup shared by the binaries.
//!
//! Logs go to a daily rolling file per component under the log directory
//! (`$DEFSCOPE_LOG_DIR`, else `~/.defscope/logs`) and optionally to stderr.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log directory when set to a non-empty value.
pub const LOG_DIR_ENV: &str = "DEFSCOPE_LOG_DIR";

/// Pick the log directory from an explicit override or the home directory.
pub fn resolve_log_dir(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match override_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".defscope/logs"),
    }
}

/// Directory the rolling log files are written to.
pub fn log_dir() -> PathBuf {
    resolve_log_dir(
        std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
        dirs::home_dir(),
    )
}

/// Install the global subscriber for `component`.
///
/// Falls back to stderr alone when the log directory cannot be created.
/// Returns `None` when no file is written or a subscriber was already
/// installed; otherwise the guard must live until the process exits so
/// buffered lines get flushed.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<WorkerGuard> {
    let dir = log_dir();
    let (file_layer, guard, dir_error) = match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            // e.g. cli.log.2024-01-21
            let appender = tracing_appender::rolling::daily(&dir, format!("{component}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard), None)
        }
        Err(err) => (None, None, Some(err)),
    };

    let stderr_layer = (to_stderr || file_layer.is_none()).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if let Some(err) = dir_error {
        warn!("Cannot create log directory {}: {}", dir.display(), err);
    }
    if installed { guard } else { None }
}
