//! Tag Launcher Core Library
//!
//! Turns proximity-tag scans read from a serial line into desktop actions:
//! emulator launches with generated arguments, files, URLs, hotkeys and
//! commands. The [`Session`] owns the tag catalog and emulator registry and
//! drives the interactive flows that edit them.
//!
//! # Example
//!
//! ```no_run
//! use tag_launcher_core::{
//!     ByteSource, CoreResult, Desktop, LineReader, Operator, ProcessManager, Session,
//!     SessionStore, SysinfoProcessTable,
//! };
//!
//! use std::{path::Path, time::Duration};
//!
//! fn serve<S, O, D>(source: S, operator: O, desktop: D) -> CoreResult<()>
//! where
//!     S: ByteSource,
//!     O: Operator,
//!     D: Desktop,
//! {
//!     let store = SessionStore::open(Path::new("data"), true)?;
//!     let processes = ProcessManager::new(SysinfoProcessTable::new());
//!     let mut session = Session::new(LineReader::new(source), operator, desktop, processes, store);
//!
//!     session.run(Duration::from_millis(50));
//!     Ok(())
//! }
//! ```

mod action;
mod catalog;
mod dispatch;
mod emulator;
mod error;
mod process;
mod protocol;
mod session;
mod store;

pub use {
    action::{ActionSpec, ActionType, BuiltinCommand, KeyName, is_url},
    catalog::{Catalog, UpsertOutcome},
    dispatch::{Desktop, Dispatched, Dispatcher},
    emulator::{
        ArgValue, ArgumentSpec, ArgumentType, CloseOnLaunch, CommandLine, EmulatorDefinition,
        EmulatorRegistry, build_command_line, quote, split_command_line,
    },
    error::CoreError,
    error::Result as CoreResult,
    process::{
        DEFAULT_GRACE_PERIOD, ProcessHandle, ProcessManager, ProcessTable, SignalOutcome,
        StopSignal, SysinfoProcessTable, TerminationFailure, TerminationReport,
        executable_basename,
    },
    protocol::{
        ByteSource, DEFAULT_MAILBOX_CAPACITY, LineReader, NoPump, Pump, ScanBuffering, ScanEvent,
        ScanMailbox, UID_PREFIX, parse_scan_line,
    },
    session::{
        CATALOG_FILE, CaptureMode, CaptureTarget, EMULATORS_FILE, Flow, LAST_SCAN_FILE, Operator,
        OperatorCommand, PREFERENCES_FILE, Preferences, Session, SessionMode, SessionState,
        SessionStore,
    },
    store::{load_json, save_json, write_atomic},
};
