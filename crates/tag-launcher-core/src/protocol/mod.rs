mod line_reader;
mod mailbox;

#[cfg(test)]
pub(crate) use line_reader::MAX_LINE_BYTES;

pub use {
    line_reader::{ByteSource, LineReader, ScanEvent, UID_PREFIX, parse_scan_line},
    mailbox::{DEFAULT_MAILBOX_CAPACITY, NoPump, Pump, ScanBuffering, ScanMailbox},
};
