mod command;
mod controller;
mod operator;
mod preferences;
mod state;

pub use {
    command::OperatorCommand,
    controller::{
        CATALOG_FILE, EMULATORS_FILE, Flow, LAST_SCAN_FILE, PREFERENCES_FILE, Session,
        SessionStore,
    },
    operator::Operator,
    preferences::Preferences,
    state::{CaptureMode, CaptureTarget, SessionMode, SessionState},
};
