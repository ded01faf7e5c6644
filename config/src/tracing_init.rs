//! Shared tracing subscriber setup for the server and CLI binaries.
//!
//! - **RUST_LOG**: filter, e.g. `info`, `prompt_template=debug,tower_http=debug`. Default `info`.
//! - **LOG_FILE**: append plain-text logs to this file instead of stderr.
//! - **LOG_DIR**: write daily-rolling `<prefix>.YYYY-MM-DD` files in this directory.
//!
//! Nothing is ever written to stdout, so CLI output stays machine readable.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the background log writer alive; drop it at the end of `main` to flush.
#[must_use = "dropping the guard stops the log writer"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs the global subscriber. `file_prefix` names the rolling files under `LOG_DIR`.
///
/// Calling this more than once is harmless: later calls leave the first subscriber in place.
pub fn init(file_prefix: &str) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    init_with_default(file_prefix, "info")
}

/// As [`init`], with the filter used when `RUST_LOG` is unset.
pub fn init_with_default(
    file_prefix: &str,
    default_filter: &str,
) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);
        let _ = tracing_subscriber::registry().with(layer).try_init();
        tracing::info!(path = %path, "logging to file");
        return Ok(LogGuard {
            _worker: Some(guard),
        });
    }

    if let Ok(dir) = std::env::var("LOG_DIR") {
        std::fs::create_dir_all(&dir)?;
        let appender = tracing_appender::rolling::daily(Path::new(&dir), file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);
        let _ = tracing_subscriber::registry().with(layer).try_init();
        tracing::info!(dir = %dir, prefix = file_prefix, "logging to rolling files");
        return Ok(LogGuard {
            _worker: Some(guard),
        });
    }

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let _ = tracing_subscriber::registry().with(layer).try_init();
    Ok(LogGuard { _worker: None })
}
