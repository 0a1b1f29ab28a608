//! Tracing setup.
//!
//! Printed commands log to stderr (`RUST_LOG`, default `info`). The TUI owns
//! the terminal, so it logs to a daily rolling file instead; the same file is
//! used by printed commands when `BIKES_LOG_FILE` is set.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

const DEFAULT_LOG_FILE: &str = "logs/bikes.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// stderr, plus the log file if `BIKES_LOG_FILE` is set.
    Stderr,
    /// Log file only.
    File,
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init(target: LogTarget) -> Result<Option<WorkerGuard>, AppError> {
    let log_file = match (target, std::env::var_os("BIKES_LOG_FILE")) {
        (_, Some(path)) => Some(PathBuf::from(path)),
        (LogTarget::File, None) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        (LogTarget::Stderr, None) => None,
    };

    let stderr_layer = (target == LogTarget::Stderr).then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter("RUST_LOG", "info"))
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (dir, name) = split_log_path(&path);
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer)
                .with_filter(env_filter("RUST_LOG_FILE", "debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::terminal(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path.file_name().unwrap_or(OsStr::new("bikes.log"));
    (dir, name)
}
