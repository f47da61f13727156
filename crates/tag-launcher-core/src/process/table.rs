use std::path::Path;

/// A running process identified by its own executable basename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessHandle {
    /// OS process id.
    pub pid: u32,
    /// Executable file name, e.g. `snes9x.exe`.
    pub name: String,
}

/// How hard to ask a process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Polite request (SIGTERM where supported).
    Graceful,
    /// Unconditional kill.
    Force,
}

/// Result of delivering a [`StopSignal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The signal was delivered.
    Sent,
    /// The process no longer exists.
    Gone,
    /// The OS refused the signal.
    Failed(String),
}

/// Access to the OS process list.
pub trait ProcessTable {
    /// Refresh and list running processes.
    fn running(&mut self) -> Vec<ProcessHandle>;

    /// Deliver a stop signal to `pid`.
    fn signal(&mut self, pid: u32, signal: StopSignal) -> SignalOutcome;

    /// Whether `pid` is still running.
    fn is_alive(&mut self, pid: u32) -> bool;
}

/// Lowercased file name of `path`, accepting both `/` and `\` separators.
pub fn executable_basename(path: &Path) -> String {
    let text = path.to_string_lossy();
    text.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
