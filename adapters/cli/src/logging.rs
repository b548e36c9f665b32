//! File-only tracing setup; the terminal itself belongs to the game.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file written inside the data directory.
pub(crate) const LOG_FILE_NAME: &str = "maze-runner.log";

/// Installs the global subscriber.
///
/// `filter` takes precedence over `RUST_LOG`; with neither, `info` is used.
/// The returned guard flushes buffered lines when dropped and must outlive the game.
pub(crate) fn init(data_dir: &Path, filter: Option<&str>) -> Result<WorkerGuard> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE_NAME);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(log = %data_dir.join(LOG_FILE_NAME).display(), "logging initialized");
    Ok(guard)
}
