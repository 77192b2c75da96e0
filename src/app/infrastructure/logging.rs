use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Events use short targets ("session", "autosave", ...) rather than module paths.
const DEFAULT_FILTER: &str = "info";

/// Keeps the non-blocking log writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Returns the log directory path: data_dir/markpad/logs/
pub fn log_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("markpad");
    path.push("logs");
    path
}

/// Install the global tracing subscriber writing to a daily rolling file.
///
/// Returns `None` when the log directory cannot be created or a subscriber is
/// already installed; the editor keeps running without file logs in that case.
pub fn init() -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "markpad.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(target: "runtime.panic", panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}

fn ensure_log_dir() -> Option<PathBuf> {
    let preferred = log_dir();
    if std::fs::create_dir_all(&preferred).is_ok() {
        return Some(preferred);
    }
    let fallback = std::env::temp_dir().join("markpad").join("logs");
    std::fs::create_dir_all(&fallback).ok()?;
    Some(fallback)
}
