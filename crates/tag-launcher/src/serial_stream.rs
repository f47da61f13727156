//! Serial port adapter feeding the line reader.

use crate::{AppError, AppResult};

use std::{io, panic::Location, time::Duration};

use error_location::ErrorLocation;
use serialport::SerialPort;
use tag_launcher_core::ByteSource;
use tracing::{info, instrument};

/// Upper bound on a single blocking read. Reads only happen when bytes are
/// already queued, so this is rarely reached.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// The tag reader's serial connection.
pub struct SerialStream {
    port: Box<dyn SerialPort>,
}

impl SerialStream {
    /// Open `port` at `baud_rate`. Failure is fatal and names both.
    #[track_caller]
    #[instrument]
    pub(crate) fn open(port: &str, baud_rate: u32) -> AppResult<Self> {
        let handle = serialport::new(port, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| AppError::SerialOpen {
                port: port.to_string(),
                baud_rate,
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(port, baud_rate, "Serial port opened");

        Ok(Self { port: handle })
    }
}

impl ByteSource for SerialStream {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let queued = self.port.bytes_to_read().map_err(io::Error::from)?;
        Ok(queued as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.port, buf)
    }
}
