use std::io::{self, ErrorKind};

use tracing::{debug, warn};

/// Prefix that marks a line as a tag scan.
pub const UID_PREFIX: &str = "UID:";

/// Longest unterminated line kept in the buffer before it is discarded.
pub(crate) const MAX_LINE_BYTES: usize = 4096;

const READ_CHUNK: usize = 256;

/// One recognized tag scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanEvent {
    /// Opaque, case-sensitive tag identifier.
    pub uid: String,
}

impl ScanEvent {
    /// Create a scan event for `uid`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Byte stream with a non-blocking "bytes available" check.
pub trait ByteSource {
    /// Number of bytes that can be read without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Turns a byte stream into complete lines and scan events.
///
/// Bytes are accumulated until a `\n` arrives; partial lines are never
/// reported. Decoding is lossy so a corrupt byte cannot stall the reader.
pub struct LineReader<S> {
    source: S,
    pending: Vec<u8>,
    discarding: bool,
}

impl<S: ByteSource> LineReader<S> {
    /// Wrap a byte source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: Vec::with_capacity(READ_CHUNK),
            discarding: false,
        }
    }

    /// Borrow the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Read whatever is available and return the complete, non-blank lines.
    ///
    /// Read errors are logged and reported as "no data this cycle".
    pub fn poll_lines(&mut self) -> Vec<String> {
        self.fill();
        self.take_lines()
    }

    /// Read whatever is available and return the scan events it contained.
    ///
    /// Non-scan lines are logged at debug level and dropped.
    pub fn poll(&mut self) -> Vec<ScanEvent> {
        self.poll_lines()
            .into_iter()
            .filter_map(|line| {
                let event = parse_scan_line(&line);
                if event.is_none() {
                    debug!(line = %line, "Serial");
                }
                event
            })
            .collect()
    }

    fn fill(&mut self) {
        loop {
            let available = match self.source.bytes_available() {
                Ok(0) => return,
                Ok(n) => n,
                Err(e) => {
                    log_read_error(&e);
                    return;
                }
            };

            let mut chunk = vec![0u8; available.min(READ_CHUNK * 16)];
            match self.source.read(&mut chunk) {
                Ok(0) => return,
                Ok(n) => self.accept(&chunk[..n]),
                Err(e) => {
                    log_read_error(&e);
                    return;
                }
            }
        }
    }

    fn accept(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.discarding {
                if byte == b'\n' {
                    self.discarding = false;
                }
                continue;
            }

            self.pending.push(byte);

            if byte != b'\n' && self.pending.len() > MAX_LINE_BYTES {
                warn!(
                    max_bytes = MAX_LINE_BYTES,
                    "Discarding over-long serial line without terminator"
                );
                self.pending.clear();
                self.discarding = true;
            }
        }
    }

    fn take_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();

        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=end).collect();
            let text = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let text = text.trim_end_matches('\r').trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }

        lines
    }
}

/// Classify a single line; `Some` iff it is a well-formed `UID:` line.
pub fn parse_scan_line(line: &str) -> Option<ScanEvent> {
    let uid = line.trim_start().strip_prefix(UID_PREFIX)?.trim();

    if uid.is_empty() {
        warn!(line = %line, "Scan line without a UID");
        return None;
    }

    Some(ScanEvent::new(uid))
}

fn log_read_error(error: &io::Error) {
    match error.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted => {}
        _ => warn!(error = %error, "Serial read failed, skipping this cycle"),
    }
}
