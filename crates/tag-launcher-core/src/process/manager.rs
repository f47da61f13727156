use crate::{
    emulator::{CloseOnLaunch, EmulatorRegistry},
    process::{ProcessHandle, ProcessTable, SignalOutcome, StopSignal, executable_basename},
};

use std::{
    collections::HashSet,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument, warn};

/// Time a process gets to exit after each stop request.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(3);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A process that survived both the graceful and the forced stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationFailure {
    /// Process id.
    pub pid: u32,
    /// Executable name.
    pub name: String,
    /// What went wrong.
    pub reason: String,
}

/// Outcome of a termination pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminationReport {
    /// Processes that were running and are now gone.
    pub terminated: usize,
    /// Processes that could not be stopped.
    pub failures: Vec<TerminationFailure>,
}

impl TerminationReport {
    fn merge(&mut self, other: TerminationReport) {
        self.terminated += other.terminated;
        self.failures.extend(other.failures);
    }
}

enum Stopped {
    AlreadyGone,
    Gracefully,
    Forcibly,
}

/// Discovers and terminates processes by executable identity.
///
/// Processes are matched on their own executable basename, case-insensitive,
/// so instances started by hand are found as well as ones we launched.
pub struct ProcessManager<T> {
    table: T,
    grace_period: Duration,
}

impl<T: ProcessTable> ProcessManager<T> {
    /// Manager with the default grace period.
    pub fn new(table: T) -> Self {
        Self::with_grace_period(table, DEFAULT_GRACE_PERIOD)
    }

    /// Manager with a custom grace period.
    pub fn with_grace_period(table: T, grace_period: Duration) -> Self {
        Self {
            table,
            grace_period,
        }
    }

    /// The underlying process table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Running processes whose executable basename matches `path`'s.
    #[instrument(skip(self))]
    pub fn find_by_executable(&mut self, path: &Path) -> Vec<ProcessHandle> {
        let snapshot = self.table.running();
        matching(&snapshot, path)
    }

    /// Stop each process: graceful request, wait, forced kill, wait.
    ///
    /// Vanished processes are treated as already stopped. A failure on one
    /// process never prevents attempts on the rest.
    #[instrument(skip(self, processes), fields(count = processes.len()))]
    pub fn terminate(&mut self, processes: &[ProcessHandle]) -> TerminationReport {
        let mut report = TerminationReport::default();

        for process in processes {
            match self.stop(process) {
                Ok(Stopped::AlreadyGone) => {
                    debug!(pid = process.pid, name = %process.name, "Process already exited");
                }
                Ok(Stopped::Gracefully) => {
                    report.terminated += 1;
                    info!(pid = process.pid, name = %process.name, "Process terminated");
                }
                Ok(Stopped::Forcibly) => {
                    report.terminated += 1;
                    info!(pid = process.pid, name = %process.name, "Process killed after grace period");
                }
                Err(reason) => {
                    warn!(pid = process.pid, name = %process.name, reason = %reason, "Could not terminate process");
                    report.failures.push(TerminationFailure {
                        pid: process.pid,
                        name: process.name.clone(),
                        reason,
                    });
                }
            }
        }

        report
    }

    /// Apply the launching emulator's close policy before it is spawned.
    ///
    /// `same` closes instances of its own executable. `others` closes the
    /// instances of every other definition whose executable exists on disk.
    #[instrument(skip(self, registry))]
    pub fn enforce_close_policy(
        &mut self,
        launching_id: &str,
        registry: &EmulatorRegistry,
    ) -> TerminationReport {
        let Some(def) = registry.get(launching_id) else {
            return TerminationReport::default();
        };

        match def.close_on_launch {
            CloseOnLaunch::None => TerminationReport::default(),
            CloseOnLaunch::Same => {
                info!(emulator_id = %launching_id, "Closing running instances of the same emulator");
                let processes = self.find_by_executable(&def.executable_path);
                self.terminate(&processes)
            }
            CloseOnLaunch::Others => {
                info!(emulator_id = %launching_id, "Closing other emulators");
                let snapshot = self.table.running();
                let mut seen = HashSet::new();
                let mut report = TerminationReport::default();

                for (other_id, other) in registry.list() {
                    if other_id == launching_id || !other.executable_path.exists() {
                        continue;
                    }

                    let processes: Vec<ProcessHandle> = matching(&snapshot, &other.executable_path)
                        .into_iter()
                        .filter(|p| seen.insert(p.pid))
                        .collect();

                    if !processes.is_empty() {
                        debug!(emulator_id = %other_id, count = processes.len(), "Closing emulator");
                        report.merge(self.terminate(&processes));
                    }
                }

                report
            }
        }
    }

    fn stop(&mut self, process: &ProcessHandle) -> Result<Stopped, String> {
        let graceful_sent = match self.table.signal(process.pid, StopSignal::Graceful) {
            SignalOutcome::Gone => return Ok(Stopped::AlreadyGone),
            SignalOutcome::Sent => true,
            SignalOutcome::Failed(reason) => {
                debug!(pid = process.pid, reason = %reason, "Graceful stop refused");
                false
            }
        };

        if graceful_sent && self.wait_for_exit(process.pid) {
            return Ok(Stopped::Gracefully);
        }

        match self.table.signal(process.pid, StopSignal::Force) {
            SignalOutcome::Gone if graceful_sent => Ok(Stopped::Gracefully),
            SignalOutcome::Gone => Ok(Stopped::AlreadyGone),
            SignalOutcome::Failed(reason) => Err(format!("forced kill refused: {}", reason)),
            SignalOutcome::Sent => {
                if self.wait_for_exit(process.pid) {
                    Ok(Stopped::Forcibly)
                } else {
                    Err(format!(
                        "still running {}s after forced kill",
                        self.grace_period.as_secs_f32()
                    ))
                }
            }
        }
    }

    fn wait_for_exit(&mut self, pid: u32) -> bool {
        let deadline = Instant::now() + self.grace_period;

        loop {
            if !self.table.is_alive(pid) {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            thread::sleep(EXIT_POLL_INTERVAL.min(deadline - now));
        }
    }
}

fn matching(snapshot: &[ProcessHandle], path: &Path) -> Vec<ProcessHandle> {
    let wanted = executable_basename(path);
    if wanted.is_empty() {
        return Vec::new();
    }

    let own_pid = std::process::id();

    snapshot
        .iter()
        .filter(|p| p.pid != own_pid && p.name.to_lowercase() == wanted)
        .cloned()
        .collect()
}
