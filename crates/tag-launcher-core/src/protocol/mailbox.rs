use crate::protocol::{ByteSource, LineReader, ScanEvent};

use std::collections::VecDeque;

use tracing::{info, warn};

/// Default number of scans held while an interactive prompt is open.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;

/// Bounded holding area for scans that arrive while a prompt blocks the loop.
///
/// When full, the oldest scan is dropped.
#[derive(Debug)]
pub struct ScanMailbox {
    pending: VecDeque<ScanEvent>,
    capacity: usize,
}

impl ScanMailbox {
    /// Create a mailbox holding at most `capacity` scans.
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Buffer a scan, evicting the oldest when at capacity.
    pub fn push(&mut self, event: ScanEvent) {
        if self.pending.len() >= self.capacity
            && let Some(dropped) = self.pending.pop_front()
        {
            warn!(uid = %dropped.uid, "Scan mailbox full, dropping oldest scan");
        }
        self.pending.push_back(event);
    }

    /// Remove and return every buffered scan in arrival order.
    pub fn drain(&mut self) -> Vec<ScanEvent> {
        self.pending.drain(..).collect()
    }

    /// Number of buffered scans.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for ScanMailbox {
    fn default() -> Self {
        Self::new(DEFAULT_MAILBOX_CAPACITY)
    }
}

/// Background work a blocking prompt performs while it waits for the operator.
pub trait Pump {
    /// Do one round of background work. Must not block.
    fn pump(&mut self);
}

/// [`Pump`] that keeps reading the serial stream into a [`ScanMailbox`].
pub struct ScanBuffering<'a, S> {
    reader: &'a mut LineReader<S>,
    mailbox: &'a mut ScanMailbox,
}

impl<'a, S: ByteSource> ScanBuffering<'a, S> {
    /// Borrow the reader and mailbox for the duration of one prompt.
    pub fn new(reader: &'a mut LineReader<S>, mailbox: &'a mut ScanMailbox) -> Self {
        Self { reader, mailbox }
    }
}

impl<S: ByteSource> Pump for ScanBuffering<'_, S> {
    fn pump(&mut self) {
        for event in self.reader.poll() {
            info!(uid = %event.uid, "Scan received while a prompt is open, buffering");
            self.mailbox.push(event);
        }
    }
}

/// [`Pump`] that does nothing.
pub struct NoPump;

impl Pump for NoPump {
    fn pump(&mut self) {}
}
