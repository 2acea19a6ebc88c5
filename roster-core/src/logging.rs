//! File-based logging setup.
//!
//! roster binaries log to a daily-rolled file inside a directory the caller
//! resolves (normally [`crate::Config::state_dir`]); stdout stays free for
//! demo output. Filtering honors `RUST_LOG` when set, otherwise the
//! configured level.

use crate::config::LoggingConfig;
use crate::error::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "roster.log";

/// Keeps the background log writer alive.
///
/// Dropping the guard flushes pending lines, so hold it for the life of the
/// process.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the global tracing subscriber, writing to `<log_dir>/roster.log`.
///
/// Creates `log_dir` if needed. May only be called once per process.
pub fn init(log_dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(dir = %log_dir.display(), level = %config.level, "logging to file");

    Ok(LoggingGuard { _worker: worker })
}

/// Route tracing output through the test harness's captured stdout.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
