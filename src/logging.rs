use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

pub const LOG_FILTER_ENV: &str = "SPDF_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Headless runs write to stderr.
    Stderr,
    /// The terminal UI owns stdout/stderr; only a configured file is used.
    FileOnly,
}

pub fn init(config: &LogConfig, sink: LogSink) -> AppResult<()> {
    let file = match (sink, config.file()) {
        (_, Some(path)) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| {
                    AppError::io_with_context(
                        source,
                        format!("failed to open log file: {}", path.display()),
                    )
                })?,
        ),
        (LogSink::Stderr, None) => None,
        (LogSink::FileOnly, None) => return Ok(()),
    };
    // Keep a subscriber installed earlier in the process (tests, embedders).
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(config))
        .with_target(false);
    let installed = match file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| AppError::unsupported(format!("failed to install logger: {err}")))
}

fn resolve_filter(config: &LogConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return filter;
    }
    EnvFilter::try_new(config.level.trim()).unwrap_or_else(|_| EnvFilter::new("info"))
}
