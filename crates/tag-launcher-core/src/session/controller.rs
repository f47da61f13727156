use crate::{
    CoreResult,
    action::{ActionSpec, ActionType, BuiltinCommand, KeyName},
    catalog::{Catalog, UpsertOutcome},
    dispatch::{Desktop, Dispatched, Dispatcher},
    emulator::{
        ArgValue, ArgumentSpec, ArgumentType, CloseOnLaunch, EmulatorDefinition,
        EmulatorRegistry, split_command_line,
    },
    process::{ProcessManager, ProcessTable},
    protocol::{ByteSource, LineReader, ScanBuffering, ScanEvent, ScanMailbox},
    session::{
        CaptureMode, CaptureTarget, Operator, OperatorCommand, Preferences, SessionMode,
        SessionState,
    },
    store,
};

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use tracing::{debug, error, info, info_span, instrument, warn};
use uuid::Uuid;

/// Tag bindings file inside the data directory.
pub const CATALOG_FILE: &str = "catalog.json";
/// Emulator registry file inside the data directory.
pub const EMULATORS_FILE: &str = "emulators.json";
/// Prompt defaults file inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";
/// Most recently scanned UID, for external configuration tools.
pub const LAST_SCAN_FILE: &str = "last_scan.txt";

/// Persisted state a [`Session`] works on.
pub struct SessionStore {
    /// Tag bindings.
    pub catalog: Catalog,
    /// Registered emulators.
    pub registry: EmulatorRegistry,
    /// Prompt defaults.
    pub preferences: Preferences,
    /// Where preferences are saved.
    pub preferences_path: PathBuf,
    /// Where the last scanned UID is written, when enabled.
    pub last_scan_path: Option<PathBuf>,
}

impl SessionStore {
    /// Load everything from `data_dir`.
    ///
    /// Unreadable preferences fall back to defaults; an unreadable catalog or
    /// registry is an error.
    #[track_caller]
    #[instrument]
    pub fn open(data_dir: &Path, record_last_scan: bool) -> CoreResult<Self> {
        let preferences_path = data_dir.join(PREFERENCES_FILE);
        let preferences = match Preferences::load(&preferences_path) {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!(error = %e, "Preferences unreadable, using defaults");
                Preferences::default()
            }
        };

        Ok(Self {
            catalog: Catalog::load(&data_dir.join(CATALOG_FILE))?,
            registry: EmulatorRegistry::load(&data_dir.join(EMULATORS_FILE))?,
            preferences,
            preferences_path,
            last_scan_path: record_last_scan.then(|| data_dir.join(LAST_SCAN_FILE)),
        })
    }
}

/// Whether the session loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep polling.
    Continue,
    /// The operator asked to quit.
    Quit,
}

/// Single owner of the catalog, registry and capture state.
///
/// Scans and operator commands are handled one at a time on the calling
/// thread. Scans read while a prompt is open are held in the mailbox and
/// discarded when the flow ends.
pub struct Session<S, O, D, P> {
    reader: LineReader<S>,
    mailbox: ScanMailbox,
    operator: O,
    desktop: D,
    processes: ProcessManager<P>,
    catalog: Catalog,
    registry: EmulatorRegistry,
    preferences: Preferences,
    preferences_path: PathBuf,
    last_scan_path: Option<PathBuf>,
    state: SessionState,
}

struct Prompter<'a, S, O> {
    operator: &'a mut O,
    pump: ScanBuffering<'a, S>,
}

impl<S: ByteSource, O: Operator> Prompter<'_, S, O> {
    fn confirm(mut self, question: &str) -> bool {
        self.operator.confirm(&mut self.pump, question)
    }

    fn choose(mut self, title: &str, options: &[String], default: Option<usize>) -> Option<usize> {
        self.operator.choose(&mut self.pump, title, options, default)
    }

    fn choose_many(mut self, title: &str, options: &[String]) -> Option<Vec<usize>> {
        self.operator.choose_many(&mut self.pump, title, options)
    }

    fn ask_text(mut self, label: &str, default: Option<&str>) -> Option<String> {
        self.operator
            .ask_text(&mut self.pump, label, default)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn pick_file(mut self, title: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
        self.operator.pick_file(&mut self.pump, title, start_dir)
    }
}

impl<S, O, D, P> Session<S, O, D, P>
where
    S: ByteSource,
    O: Operator,
    D: Desktop,
    P: ProcessTable,
{
    /// Assemble a session in [`SessionMode::Idle`].
    pub fn new(
        reader: LineReader<S>,
        operator: O,
        desktop: D,
        processes: ProcessManager<P>,
        store: SessionStore,
    ) -> Self {
        Self {
            reader,
            mailbox: ScanMailbox::default(),
            operator,
            desktop,
            processes,
            catalog: store.catalog,
            registry: store.registry,
            preferences: store.preferences,
            preferences_path: store.preferences_path,
            last_scan_path: store.last_scan_path,
            state: SessionState::default(),
        }
    }

    /// Current capture state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Tag bindings.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Registered emulators.
    pub fn registry(&self) -> &EmulatorRegistry {
        &self.registry
    }

    /// Prompt defaults.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The operator capability.
    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// The operator capability, mutably.
    pub fn operator_mut(&mut self) -> &mut O {
        &mut self.operator
    }

    /// The desktop capability.
    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    /// The process manager used for close policies.
    pub fn processes(&self) -> &ProcessManager<P> {
        &self.processes
    }

    /// The serial line reader.
    pub fn reader_mut(&mut self) -> &mut LineReader<S> {
        &mut self.reader
    }

    /// Poll both inputs until the operator quits.
    pub fn run(&mut self, poll_interval: Duration) {
        info!(tags = self.catalog.len(), emulators = self.registry.len(), "Session started");

        while self.step() == Flow::Continue {
            thread::sleep(poll_interval);
        }

        info!("Session ended");
    }

    /// Handle every scan that is ready, then at most one operator command.
    pub fn step(&mut self) -> Flow {
        for event in self.reader.poll() {
            self.handle_scan(event);
        }

        match self.operator.next_command() {
            Some(command) => self.handle_command(command),
            None => Flow::Continue,
        }
    }

    /// React to one scanned tag according to the current mode.
    #[instrument(skip(self, event), fields(uid = %event.uid))]
    pub fn handle_scan(&mut self, event: ScanEvent) {
        self.record_last_scan(&event.uid);

        match self.state.mode {
            SessionMode::Idle => match self.catalog.lookup(&event.uid).cloned() {
                Some(spec) => self.run_action(&event.uid, &spec),
                None => self.add_unknown_tag(&event.uid),
            },
            SessionMode::AwaitingScan => {
                if let Some(target) = self.state.pending_capture.take() {
                    self.bind_scanned(&event.uid, &target);
                }
                self.state.reset();
            }
            SessionMode::BatchActive => match self.state.batch_action.clone() {
                Some(target) => {
                    self.bind_scanned(&event.uid, &target);
                    self.state.mode = SessionMode::BatchActive;
                    self.operator.notify("Scan the next tag, or type done to finish.");
                }
                None => self.state.reset(),
            },
            mode => debug!(mode = ?mode, "Scan ignored mid-flow"),
        }

        self.discard_buffered_scans();
    }

    /// React to one operator command.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, command: OperatorCommand) -> Flow {
        match (command, self.state.mode) {
            (OperatorCommand::Quit, _) => {
                info!("Quit requested");
                return Flow::Quit;
            }
            (OperatorCommand::Done, SessionMode::BatchActive) => {
                self.state.reset();
                self.operator.notify("Batch finished.");
            }
            (OperatorCommand::Done, SessionMode::AwaitingScan) => {
                self.state.reset();
                self.operator.notify("Add cancelled.");
            }
            (OperatorCommand::Done, _) => debug!("Nothing to finish"),
            (OperatorCommand::Add, SessionMode::Idle) => self.add_tags(),
            (OperatorCommand::Delete, SessionMode::Idle) => self.delete_tags(),
            (OperatorCommand::RegisterEmulator, SessionMode::Idle) => self.register_emulator(),
            (command, mode) => {
                debug!(command = ?command, mode = ?mode, "Command ignored outside idle");
                self.operator
                    .notify("Finish the current capture first (type done).");
            }
        }

        self.discard_buffered_scans();
        Flow::Continue
    }

    fn prompt(&mut self) -> Prompter<'_, S, O> {
        Prompter {
            operator: &mut self.operator,
            pump: ScanBuffering::new(&mut self.reader, &mut self.mailbox),
        }
    }

    fn run_action(&mut self, uid: &str, spec: &ActionSpec) {
        let mut dispatcher = Dispatcher::new(&mut self.desktop, &mut self.processes);

        match dispatcher.dispatch(spec, &self.registry) {
            Some(Dispatched::Launched {
                emulator_id,
                pid,
                closed,
                ..
            }) => {
                if closed.terminated > 0 {
                    self.operator.notify(&format!(
                        "Closed {} running emulator process(es).",
                        closed.terminated
                    ));
                }
                for failure in &closed.failures {
                    self.operator.notify(&format!(
                        "Could not close {} (pid {}): {}",
                        failure.name, failure.pid, failure.reason
                    ));
                }
                self.operator
                    .notify(&format!("Launched {} (pid {}).", emulator_id, pid));
            }
            Some(_) => self.operator.notify(&format!("Ran {}.", spec)),
            None => self
                .operator
                .notify(&format!("Tag {}: could not run {}, see log.", uid, spec)),
        }
    }

    fn add_unknown_tag(&mut self, uid: &str) {
        let flow_id = Uuid::new_v4();
        let span = info_span!("add_unknown_tag", %flow_id, uid = %uid);
        let _entered = span.enter();

        if !self
            .prompt()
            .confirm(&format!("Tag {} is not bound. Add it now?", uid))
        {
            info!("Add declined");
            return;
        }

        self.state.mode = SessionMode::AwaitingType;
        let Some(target) = self.choose_target() else {
            return self.cancel_flow();
        };

        self.preferences.last_action_type = Some(target.action_type);
        self.save_preferences();

        self.bind_scanned(uid, &target);
        self.state.reset();
    }

    fn add_tags(&mut self) {
        let flow_id = Uuid::new_v4();
        let span = info_span!("add_tags", %flow_id);
        let _entered = span.enter();

        self.state.mode = SessionMode::AwaitingMode;
        let options: Vec<String> = CaptureMode::ALL.iter().map(ToString::to_string).collect();
        let default = self
            .preferences
            .last_mode
            .and_then(|last| CaptureMode::ALL.iter().position(|m| *m == last))
            .or(Some(0));
        let Some(mode) = self
            .prompt()
            .choose("Capture mode", &options, default)
            .and_then(|i| CaptureMode::ALL.get(i).copied())
        else {
            return self.cancel_flow();
        };

        self.state.mode = SessionMode::AwaitingType;
        let Some(target) = self.choose_target() else {
            return self.cancel_flow();
        };

        self.preferences.last_mode = Some(mode);
        self.preferences.last_action_type = Some(target.action_type);
        self.save_preferences();

        info!(mode = ?mode, target = ?target, "Capture started");

        match mode {
            CaptureMode::Single => {
                self.operator
                    .notify(&format!("Scan the tag to bind to {}.", target_label(&target)));
                self.state.mode = SessionMode::AwaitingScan;
                self.state.pending_capture = Some(target);
            }
            CaptureMode::Batch => {
                self.operator.notify(&format!(
                    "Batch mode: each scanned tag is bound to {}. Type done to finish.",
                    target_label(&target)
                ));
                self.state.mode = SessionMode::BatchActive;
                self.state.batch_action = Some(target);
            }
        }
    }

    fn delete_tags(&mut self) {
        if self.catalog.is_empty() {
            self.operator.notify("No tags saved.");
            return;
        }

        let uids: Vec<String> = self.catalog.all().map(|(uid, _)| uid.to_string()).collect();
        let options: Vec<String> = self
            .catalog
            .all()
            .map(|(uid, spec)| format!("{}: {}", uid, spec))
            .collect();

        let Some(selected) = self.prompt().choose_many("Tags to delete", &options) else {
            return self.cancel_flow();
        };

        let chosen: BTreeSet<String> = selected
            .into_iter()
            .filter_map(|i| uids.get(i).cloned())
            .collect();

        if chosen.is_empty() {
            self.operator.notify("Nothing selected.");
            return;
        }

        if !self
            .prompt()
            .confirm(&format!("Delete {} tags?", chosen.len()))
        {
            self.operator.notify("Nothing deleted.");
            return;
        }

        match self.catalog.remove(&chosen) {
            Ok(removed) => self.operator.notify(&format!("Deleted {} tags.", removed)),
            Err(e) => {
                error!(error = %e, "Could not save catalog after delete");
                self.operator
                    .notify("Tags deleted for this run, but saving failed.");
            }
        }
    }

    fn register_emulator(&mut self) {
        let flow_id = Uuid::new_v4();
        let span = info_span!("register_emulator", %flow_id);
        let _entered = span.enter();

        let Some(id) = self.prompt().ask_text("Emulator id", None) else {
            return self.cancel_flow();
        };

        let existing = self.registry.get(&id).cloned();
        if existing.is_some()
            && !self
                .prompt()
                .confirm(&format!("Emulator {} already exists. Update it?", id))
        {
            self.operator.notify("Kept existing emulator.");
            return;
        }

        let default_name = existing
            .as_ref()
            .map_or_else(|| id.clone(), |def| def.display_name.clone());
        let Some(display_name) = self.prompt().ask_text("Display name", Some(&default_name))
        else {
            return self.cancel_flow();
        };

        let start_dir = existing
            .as_ref()
            .and_then(|def| def.executable_path.parent().map(Path::to_path_buf))
            .or_else(|| self.preferences.last_browse_dir.clone());
        let Some(executable_path) = self
            .prompt()
            .pick_file("Emulator executable", start_dir.as_deref())
        else {
            return self.cancel_flow();
        };
        self.preferences.remember_browse_dir(&executable_path);
        self.save_preferences();

        let current = existing
            .as_ref()
            .map_or_else(CloseOnLaunch::default, |def| def.close_on_launch);
        let options: Vec<String> = CloseOnLaunch::ALL
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        let default = CloseOnLaunch::ALL.iter().position(|p| *p == current);
        let Some(close_on_launch) = self
            .prompt()
            .choose("Close on launch", &options, default)
            .and_then(|i| CloseOnLaunch::ALL.get(i).copied())
        else {
            return self.cancel_flow();
        };

        let def = EmulatorDefinition {
            display_name,
            executable_path,
            close_on_launch,
            arguments: existing.map(|def| def.arguments).unwrap_or_default(),
        };

        match self.registry.put(&id, def) {
            Ok(()) => self.operator.notify(&format!("Emulator {} saved.", id)),
            Err(e) => {
                error!(emulator_id = %id, error = %e, "Could not save emulator registry");
                self.operator
                    .notify("Emulator registered for this run, but saving failed.");
            }
        }
    }

    fn choose_target(&mut self) -> Option<CaptureTarget> {
        let options: Vec<String> = ActionType::ALL
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        let default = self
            .preferences
            .last_action_type
            .and_then(|last| ActionType::ALL.iter().position(|t| *t == last));

        let index = self.prompt().choose("Action type", &options, default)?;
        let action_type = ActionType::ALL.get(index).copied()?;

        let emulator_id = match action_type {
            ActionType::Emulator => Some(self.choose_emulator()?),
            _ => None,
        };

        Some(CaptureTarget {
            action_type,
            emulator_id,
        })
    }

    fn choose_emulator(&mut self) -> Option<String> {
        if self.registry.is_empty() {
            self.operator
                .notify("No emulators registered yet. Press e to register one.");
            return None;
        }

        let ids: Vec<String> = self.registry.list().map(|(id, _)| id.to_string()).collect();
        let options: Vec<String> = self
            .registry
            .list()
            .map(|(id, def)| format!("{} ({})", def.display_name, id))
            .collect();

        let index = self.prompt().choose("Emulator", &options, None)?;
        ids.get(index).cloned()
    }

    fn bind_scanned(&mut self, uid: &str, target: &CaptureTarget) {
        self.state.mode = SessionMode::AwaitingConfig;

        match self.capture_value(target) {
            Some(spec) => self.save_binding(uid, spec),
            None => self
                .operator
                .notify(&format!("Cancelled, tag {} not saved.", uid)),
        }
    }

    fn capture_value(&mut self, target: &CaptureTarget) -> Option<ActionSpec> {
        match target.action_type {
            ActionType::Url => {
                let value = self.prompt().ask_text("URL", None)?;
                Some(ActionSpec::Url { value })
            }
            ActionType::File => {
                let path = self.pick_file_remembered("File to open")?;
                Some(ActionSpec::File { path })
            }
            ActionType::Command => {
                let options: Vec<String> = BuiltinCommand::ALL
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect();
                let index = self.prompt().choose("Command", &options, Some(0))?;
                BuiltinCommand::ALL
                    .get(index)
                    .map(|command| ActionSpec::Command {
                        name: command.name().to_string(),
                    })
            }
            ActionType::Hotkey => {
                let line = self
                    .prompt()
                    .ask_text("Keys, comma separated (e.g. ctrl,shift,r)", None)?;
                let keys: Vec<String> = line
                    .split([',', '+'])
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();

                match KeyName::parse_chord(&keys) {
                    Ok(_) => Some(ActionSpec::Hotkey { keys }),
                    Err(e) => {
                        warn!(keys = %line, error = %e, "Rejected hotkey");
                        self.operator.notify(&format!("Invalid hotkey: {}", line));
                        None
                    }
                }
            }
            ActionType::Shell => {
                let line = self.prompt().ask_text("Command line", None)?;
                let argv = split_command_line(&line);
                if argv.is_empty() {
                    self.operator.notify("Empty command line.");
                    return None;
                }
                Some(ActionSpec::Shell { argv })
            }
            ActionType::Emulator => {
                let emulator_id = target.emulator_id.clone()?;
                let Some(def) = self.registry.get(&emulator_id).cloned() else {
                    self.operator
                        .notify(&format!("Emulator {} is no longer registered.", emulator_id));
                    return None;
                };
                let config = self.configure_arguments(&def)?;
                Some(ActionSpec::Emulator {
                    emulator_id,
                    config,
                })
            }
        }
    }

    fn configure_arguments(
        &mut self,
        def: &EmulatorDefinition,
    ) -> Option<BTreeMap<String, ArgValue>> {
        let mut config = BTreeMap::new();

        for arg in &def.arguments {
            if let Some(description) = arg.description.as_deref().filter(|d| !d.is_empty()) {
                self.operator
                    .notify(&format!("{}: {}", arg.label(), description));
            }

            match self.ask_argument(arg) {
                Some(Some(value)) => {
                    config.insert(arg.name.clone(), value);
                }
                Some(None) => {}
                None if arg.required => {
                    self.operator.notify(&format!(
                        "{} is required, tag not saved.",
                        arg.label()
                    ));
                    return None;
                }
                None => debug!(argument = %arg.name, "Optional argument skipped"),
            }
        }

        Some(config)
    }

    /// `None` when unanswered, `Some(None)` when answered with "no value".
    fn ask_argument(&mut self, arg: &ArgumentSpec) -> Option<Option<ArgValue>> {
        match arg.arg_type {
            ArgumentType::File => {
                let path = self.pick_file_remembered(arg.label())?;
                Some(Some(ArgValue::Text(path.to_string_lossy().into_owned())))
            }
            ArgumentType::Choice if !arg.choices.is_empty() => {
                let default = arg.default.as_ref().and_then(|d| {
                    let d = d.to_string();
                    arg.choices.iter().position(|c| *c == d)
                });
                let index = self.prompt().choose(arg.label(), &arg.choices, default)?;
                arg.choices
                    .get(index)
                    .map(|choice| Some(ArgValue::Text(choice.clone())))
            }
            ArgumentType::Text | ArgumentType::Choice => {
                let default = arg.default.as_ref().map(ToString::to_string);
                let text = self.prompt().ask_text(arg.label(), default.as_deref())?;
                Some(Some(ArgValue::Text(text)))
            }
            ArgumentType::Toggle => {
                let options = vec!["off".to_string(), "on".to_string()];
                let on_by_default = arg.default.as_ref().is_some_and(ArgValue::is_truthy);
                let index = self
                    .prompt()
                    .choose(arg.label(), &options, Some(usize::from(on_by_default)))?;
                Some((index == 1).then_some(ArgValue::Flag(true)))
            }
        }
    }

    fn pick_file_remembered(&mut self, title: &str) -> Option<PathBuf> {
        let start_dir = self.preferences.last_browse_dir.clone();
        let path = self.prompt().pick_file(title, start_dir.as_deref())?;

        self.preferences.remember_browse_dir(&path);
        self.save_preferences();

        Some(path)
    }

    fn save_binding(&mut self, uid: &str, spec: ActionSpec) {
        let Self {
            catalog,
            operator,
            reader,
            mailbox,
            ..
        } = self;
        let mut pump = ScanBuffering::new(reader, mailbox);

        let result = catalog.upsert(uid, spec, |existing| {
            operator.confirm(
                &mut pump,
                &format!("Tag {} is bound to {}. Overwrite?", uid, existing),
            )
        });

        match result {
            Ok(UpsertOutcome::Inserted) => operator.notify(&format!("Saved tag {}.", uid)),
            Ok(UpsertOutcome::Replaced { previous }) => {
                operator.notify(&format!("Saved tag {} (was {}).", uid, previous))
            }
            Ok(UpsertOutcome::Cancelled) => {
                operator.notify(&format!("Kept existing binding for {}.", uid))
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "Could not save catalog");
                operator.notify(&format!(
                    "Tag {} bound for this run, but saving failed.",
                    uid
                ));
            }
        }
    }

    fn cancel_flow(&mut self) {
        self.state.reset();
        self.operator.notify("Cancelled.");
    }

    fn discard_buffered_scans(&mut self) {
        for event in self.mailbox.drain() {
            info!(uid = %event.uid, "Discarding scan received during a prompt");
            self.operator.notify(&format!(
                "Ignored tag {} scanned while a prompt was open.",
                event.uid
            ));
        }
    }

    fn record_last_scan(&self, uid: &str) {
        if let Some(path) = &self.last_scan_path
            && let Err(e) = store::write_atomic(path, uid.as_bytes())
        {
            warn!(path = ?path, error = %e, "Could not record last scan");
        }
    }

    fn save_preferences(&self) {
        if let Err(e) = self.preferences.save(&self.preferences_path) {
            warn!(error = %e, "Could not save preferences");
        }
    }
}

fn target_label(target: &CaptureTarget) -> String {
    match &target.emulator_id {
        Some(id) => format!("emulator {}", id),
        None => target.action_type.label().to_string(),
    }
}
