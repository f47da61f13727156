use crate::{
    CoreError, CoreResult,
    action::{ActionSpec, BuiltinCommand, KeyName},
    dispatch::Desktop,
    emulator::{CommandLine, EmulatorRegistry, build_command_line},
    process::{ProcessManager, ProcessTable, TerminationReport},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{error, info, instrument, warn};

/// What an executed action did.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// A built-in command's chord was pressed.
    Command {
        /// The command that ran.
        command: BuiltinCommand,
    },
    /// A hotkey chord was pressed.
    Hotkey {
        /// Keys in press order.
        keys: Vec<KeyName>,
    },
    /// A URL was handed to the browser.
    OpenedUrl {
        /// The URL.
        url: String,
    },
    /// A file was handed to its OS association.
    OpenedFile {
        /// The path.
        path: PathBuf,
    },
    /// A shell action was spawned.
    Spawned {
        /// Child pid.
        pid: u32,
    },
    /// An emulator was launched after applying its close policy.
    Launched {
        /// Registry id.
        emulator_id: String,
        /// Child pid.
        pid: u32,
        /// Invocation used.
        command_line: CommandLine,
        /// Processes closed by the policy before launch.
        closed: TerminationReport,
    },
}

/// Turns an [`ActionSpec`] into its effect.
pub struct Dispatcher<'a, D, P> {
    desktop: &'a mut D,
    processes: &'a mut ProcessManager<P>,
}

impl<'a, D: Desktop, P: ProcessTable> Dispatcher<'a, D, P> {
    /// Borrow the desktop and process manager for one dispatch.
    pub fn new(desktop: &'a mut D, processes: &'a mut ProcessManager<P>) -> Self {
        Self { desktop, processes }
    }

    /// Execute `spec`, returning the first error.
    #[instrument(skip(self, registry), fields(action = %spec))]
    pub fn execute(
        &mut self,
        spec: &ActionSpec,
        registry: &EmulatorRegistry,
    ) -> CoreResult<Dispatched> {
        match spec {
            ActionSpec::Command { name } => {
                let command =
                    BuiltinCommand::from_name(name).ok_or_else(|| CoreError::UnknownCommand {
                        name: name.clone(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                self.desktop.press_chord(&command.chord())?;
                info!(command = command.name(), "Built-in command executed");
                Ok(Dispatched::Command { command })
            }
            ActionSpec::Hotkey { keys } => {
                let keys = KeyName::parse_chord(keys)?;
                self.desktop.press_chord(&keys)?;
                info!(keys = ?keys, "Hotkey pressed");
                Ok(Dispatched::Hotkey { keys })
            }
            ActionSpec::Url { value } => {
                self.desktop.open_url(value)?;
                info!(url = %value, "URL opened");
                Ok(Dispatched::OpenedUrl { url: value.clone() })
            }
            ActionSpec::File { path } => {
                self.desktop.open_path(path)?;
                info!(path = ?path, "File opened");
                Ok(Dispatched::OpenedFile { path: path.clone() })
            }
            ActionSpec::Shell { argv } => {
                let (program, args) = argv.split_first().ok_or_else(|| {
                    CoreError::EmptyShellCommand {
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                let pid = self.desktop.spawn_detached(Path::new(program), args)?;
                info!(pid, program = %program, "Command spawned");
                Ok(Dispatched::Spawned { pid })
            }
            ActionSpec::Emulator {
                emulator_id,
                config,
            } => {
                let def = registry
                    .get(emulator_id)
                    .ok_or_else(|| CoreError::UnknownEmulator {
                        id: emulator_id.clone(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;

                if !def.executable_path.exists() {
                    return Err(CoreError::ExecutableNotFound {
                        path: def.executable_path.clone(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                let closed = self.processes.enforce_close_policy(emulator_id, registry);
                for failure in &closed.failures {
                    warn!(pid = failure.pid, name = %failure.name, reason = %failure.reason, "Launching despite process that would not close");
                }

                let command_line = build_command_line(def, config);
                info!(emulator_id = %emulator_id, command_line = %command_line, "Launching emulator");

                let pid = self
                    .desktop
                    .spawn_detached(command_line.program(), command_line.args())?;

                Ok(Dispatched::Launched {
                    emulator_id: emulator_id.clone(),
                    pid,
                    command_line,
                    closed,
                })
            }
        }
    }

    /// Execute `spec`, logging any failure instead of returning it.
    pub fn dispatch(
        &mut self,
        spec: &ActionSpec,
        registry: &EmulatorRegistry,
    ) -> Option<Dispatched> {
        match self.execute(spec, registry) {
            Ok(dispatched) => Some(dispatched),
            Err(e) => {
                error!(action = %spec, error = %e, "Action failed");
                None
            }
        }
    }
}
