use crate::process::{ProcessHandle, ProcessTable, SignalOutcome, StopSignal};

use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, Signal, System, UpdateKind,
};
use tracing::instrument;

/// [`ProcessTable`] over the live OS process list.
///
/// Zombies count as exited: a killed child that has not been reaped yet is
/// no longer running from the operator's point of view.
pub struct SysinfoProcessTable {
    system: System,
}

impl SysinfoProcessTable {
    /// Create an empty table; the first [`ProcessTable::running`] call fills it.
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh_one(&mut self, pid: Pid) -> Option<&Process> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        self.system
            .process(pid)
            .filter(|p| p.status() != ProcessStatus::Zombie)
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SysinfoProcessTable {
    #[instrument(skip(self))]
    fn running(&mut self) -> Vec<ProcessHandle> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
        );

        self.system
            .processes()
            .iter()
            .filter(|(_, p)| p.status() != ProcessStatus::Zombie)
            .map(|(pid, p)| ProcessHandle {
                pid: pid.as_u32(),
                name: p
                    .exe()
                    .and_then(|exe| exe.file_name())
                    .unwrap_or_else(|| p.name())
                    .to_string_lossy()
                    .into_owned(),
            })
            .collect()
    }

    fn signal(&mut self, pid: u32, signal: StopSignal) -> SignalOutcome {
        let pid = Pid::from_u32(pid);

        let delivered = match self.refresh_one(pid) {
            None => return SignalOutcome::Gone,
            // Platforms without SIGTERM fall back to a plain kill.
            Some(process) => match signal {
                StopSignal::Graceful => process
                    .kill_with(Signal::Term)
                    .unwrap_or_else(|| process.kill()),
                StopSignal::Force => process.kill(),
            },
        };

        if delivered {
            SignalOutcome::Sent
        } else if self.refresh_one(pid).is_none() {
            SignalOutcome::Gone
        } else {
            SignalOutcome::Failed("signal was not delivered".to_string())
        }
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        self.refresh_one(Pid::from_u32(pid)).is_some()
    }
}
