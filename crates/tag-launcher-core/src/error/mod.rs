use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading or writing a persisted file failed.
    #[error("Persistence error for {path:?}: {reason} {location}")]
    Persistence {
        /// File that could not be read or written.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Scanned tag maps to an emulator id that is not registered.
    #[error("Unknown emulator: {id} {location}")]
    UnknownEmulator {
        /// The unresolved emulator id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Emulator executable does not exist at launch time.
    #[error("Emulator executable not found: {path:?} {location}")]
    ExecutableNotFound {
        /// Configured executable path.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Named built-in command does not exist.
    #[error("Unknown command: {name} {location}")]
    UnknownCommand {
        /// The requested command name.
        name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Hotkey has no keys or names a key that cannot be synthesized.
    #[error("Invalid hotkey: {reason} {location}")]
    InvalidHotkey {
        /// Description of the problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Shell action with an empty argv.
    #[error("Shell action has no program {location}")]
    EmptyShellCommand {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A desktop capability (input synthesis, open, spawn) failed.
    #[error("{capability} failed: {reason} {location}")]
    Capability {
        /// Which capability failed.
        capability: &'static str,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from the byte stream or filesystem.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Build a [`CoreError::Persistence`] at the caller's location.
    #[track_caller]
    pub fn persistence(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CoreError::Persistence {
            path: path.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`CoreError::Capability`] at the caller's location.
    #[track_caller]
    pub fn capability(capability: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Capability {
            capability,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for CoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
