use crate::{
    AppError, AppResult, ConsoleOperator, SerialStream, SystemDesktop, config::Config,
    keyboard_forwarder,
};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use tag_launcher_core::{
    LineReader, Operator, ProcessManager, Session, SessionStore, SysinfoProcessTable,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// How long shutdown waits for the stdin forwarder.
const FORWARDER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Main application.
///
/// The session loop runs on the blocking pool because every prompt and
/// termination is synchronous. The async runtime only hosts the stdin
/// forwarder and coordinates shutdown.
pub struct App {
    pub(crate) config: Config,
    pub(crate) data_dir: PathBuf,
}

impl App {
    /// Resolve directories for `config`.
    #[track_caller]
    pub(crate) fn new(config: Config) -> AppResult<Self> {
        let data_dir = config.data_dir()?;
        Ok(Self { config, data_dir })
    }

    /// Open the serial port and the data files, then serve until the operator quits.
    ///
    /// Fails only at startup: when the port cannot be opened or the data
    /// files cannot be read.
    #[track_caller]
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub(crate) fn run(self) -> AppResult<()> {
        info!("Tag launcher starting");

        let serial = SerialStream::open(&self.config.serial.port, self.config.serial.baud_rate)?;
        let store = SessionStore::open(&self.data_dir, self.config.storage.record_last_scan)?;

        let runtime = tokio::runtime::Runtime::new().map_err(|e| AppError::Runtime {
            reason: format!("Failed to create tokio runtime: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let result = runtime.block_on(self.serve(serial, store));

        // The forwarder may still be parked in read_line; do not wait for it.
        runtime.shutdown_background();

        info!("Tag launcher shut down");
        result
    }

    async fn serve(self, serial: SerialStream, store: SessionStore) -> AppResult<()> {
        let (line_tx, line_rx) = mpsc::channel(keyboard_forwarder::KEYBOARD_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let forwarder = keyboard_forwarder::spawn(line_tx, shutdown_rx);

        let poll_interval = self.config.process.poll_interval();
        let grace_period = self.config.process.grace_period();

        let session = tokio::task::spawn_blocking(move || {
            let operator = ConsoleOperator::new(line_rx, std::io::stdout(), poll_interval);
            let processes =
                ProcessManager::with_grace_period(SysinfoProcessTable::new(), grace_period);
            let mut session = Session::new(
                LineReader::new(serial),
                operator,
                SystemDesktop,
                processes,
                store,
            );

            session.operator_mut().notify(
                "Ready. Scan a tag, or type a (add), d (delete), e (register emulator), q (quit).",
            );
            session.run(poll_interval);
        });

        let outcome = session.await.map_err(|e| AppError::Runtime {
            reason: format!("Session task failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        });

        let _ = shutdown_tx.send(true);

        match tokio::time::timeout(FORWARDER_JOIN_TIMEOUT, forwarder).await {
            Ok(Ok(())) => debug!("Keyboard forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Keyboard forwarder task panicked"),
            Err(_) => debug!(
                "Keyboard forwarder did not stop within timeout, \
                 will be cleaned up on exit"
            ),
        }

        if let Err(e) = &outcome {
            error!(error = %e, "Session ended abnormally");
        }
        outcome
    }
}
