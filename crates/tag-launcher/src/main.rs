//! Tag Launcher: turns proximity-tag scans into emulator launches, files,
//! URLs and keyboard shortcuts.

mod app;
mod chord_guard;
mod cli;
mod config;
mod console_operator;
mod error;
mod keyboard_forwarder;
mod logging;
mod serial_stream;
mod system_desktop;

pub(crate) use {
    app::App,
    chord_guard::ChordGuard,
    cli::Cli,
    console_operator::ConsoleOperator,
    error::{AppError, Result as AppResult},
    serial_stream::SerialStream,
    system_desktop::SystemDesktop,
};

use crate::config::Config;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

/// Application entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Flushes the log file when main returns.
    let _log_guard = logging::init();

    let config = match Config::load() {
        Ok(c) => c.with_overrides(&cli),
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        port = %config.serial.port,
        baud_rate = config.serial.baud_rate,
        "Configuration ready"
    );

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to prepare data directory: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Tag launcher failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
