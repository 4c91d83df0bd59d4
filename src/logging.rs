use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "vocab-typing.log";

/// Keeps the background log writer alive; dropping it flushes pending lines.
pub struct LogGuard
{
    _guard: WorkerGuard,
}

/// Logs go to a daily file because the practice view owns the terminal.
/// Returns `None` when the log directory cannot be created; the program runs
/// without logs in that case.
pub fn init_tracing(filter: &str, log_dir: &Path) -> Option<LogGuard>
{
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: couldn't create log directory {} ({err}). Logging disabled.",
            log_dir.display()
        );
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }

    Some(LogGuard { _guard: guard })
}
