mod manager;
mod sysinfo_table;
mod table;

pub use {
    manager::{DEFAULT_GRACE_PERIOD, ProcessManager, TerminationFailure, TerminationReport},
    sysinfo_table::SysinfoProcessTable,
    table::{ProcessHandle, ProcessTable, SignalOutcome, StopSignal, executable_basename},
};
