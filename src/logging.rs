//! Tracing setup: stdout plus a daily rolling file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "classroll.log";

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
///
/// Returns the file writer guard; keep it alive until exit so buffered lines
/// are flushed. Returns `None` when the log directory cannot be created, in
/// which case only stdout logging is active.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = || EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
        tracing::warn!("File logging disabled, cannot create {}: {}", log_dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Some(guard)
}
