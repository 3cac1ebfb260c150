//! Structured logging setup using `tracing`.
//!
//! The query service logs to stderr (or a file when launched by the client);
//! the terminal client always logs to a file because it owns the screen.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Human-readable output on stderr
    Stderr,
    /// Appended to the given file, without ANSI colors
    File(PathBuf),
}

/// Maps a `-v` count to a level name. 0 is `info`, 1 is `debug`, 2+ is `trace`.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Builds the filter: `RUST_LOG` wins when set, otherwise our crate and the
/// HTTP trace layer log at `level` and everything else at `warn`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,rag_search={level},tower_http={level}")))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_tracing(verbosity: u8, target: LogTarget) -> Result<()> {
    let filter = build_filter(level_for(verbosity));
    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .context("failed to install tracing subscriber")?,
        LogTarget::File(path) => {
            crate::utils::ensure_parent_directory(&path)?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file: {}", path.display()))?;

            registry
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_target(false)
                        .with_ansi(false),
                )
                .try_init()
                .context("failed to install tracing subscriber")?
        }
    }

    Ok(())
}
