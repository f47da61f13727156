//! Logging setup: console output plus a daily rolling log file.

use crate::{AppResult, config::Config};

use std::fs;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "tag_launcher=debug,tag_launcher_core=debug";
const LOG_FILE_PREFIX: &str = "tag-launcher.log";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. When the log directory cannot
/// be prepared the file layer is skipped and only the console is used. The
/// returned guard flushes the file writer when dropped and must live until
/// the process exits.
pub(crate) fn init() -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file = match file_writer() {
        Ok(pair) => Some(pair),
        Err(e) => {
            eprintln!("File logging disabled: {}", e);
            None
        }
    };

    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn file_writer() -> AppResult<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let log_dir = Config::log_dir()?;
    fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}
