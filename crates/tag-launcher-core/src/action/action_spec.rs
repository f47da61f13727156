use crate::{
    action::{ActionType, BuiltinCommand},
    emulator::{ArgValue, split_command_line},
};

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// What happens when a tag is scanned.
///
/// Persisted as a single-key record (`{"url": "..."}`, `{"hotkey": [..]}`,
/// `{"emulator": "id", "config": {..}}`, ...). Bare strings written by older
/// versions are coerced on load, see [`ActionSpec::from_legacy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredAction", into = "StoredAction")]
pub enum ActionSpec {
    /// Run a named built-in command.
    Command {
        /// Built-in name, e.g. `close_window`.
        name: String,
    },
    /// Press the keys together.
    Hotkey {
        /// Ordered key names, modifiers first.
        keys: Vec<String>,
    },
    /// Open in the default URL handler.
    Url {
        /// The URL.
        value: String,
    },
    /// Open with the OS file association.
    File {
        /// Path handed to the OS.
        path: PathBuf,
    },
    /// Spawn a program directly from argv.
    Shell {
        /// Program followed by its arguments.
        argv: Vec<String>,
    },
    /// Launch a registered emulator.
    Emulator {
        /// Registry id.
        emulator_id: String,
        /// Argument values keyed by argument name.
        config: BTreeMap<String, ArgValue>,
    },
}

impl ActionSpec {
    /// Coerce a legacy bare-string entry.
    ///
    /// `http://`/`https://` prefixes become [`ActionSpec::Url`], built-in
    /// names become [`ActionSpec::Command`], anything else a
    /// [`ActionSpec::File`].
    pub fn from_legacy(value: &str) -> Self {
        if is_url(value) {
            ActionSpec::Url {
                value: value.to_string(),
            }
        } else if BuiltinCommand::from_name(value).is_some() {
            ActionSpec::Command {
                name: value.to_string(),
            }
        } else {
            ActionSpec::File {
                path: PathBuf::from(value),
            }
        }
    }

    /// The capture type that produces this variant.
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionSpec::Command { .. } => ActionType::Command,
            ActionSpec::Hotkey { .. } => ActionType::Hotkey,
            ActionSpec::Url { .. } => ActionType::Url,
            ActionSpec::File { .. } => ActionType::File,
            ActionSpec::Shell { .. } => ActionType::Shell,
            ActionSpec::Emulator { .. } => ActionType::Emulator,
        }
    }
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionSpec::Command { name } => write!(f, "command {}", name),
            ActionSpec::Hotkey { keys } => write!(f, "hotkey {}", keys.join("+")),
            ActionSpec::Url { value } => write!(f, "url {}", value),
            ActionSpec::File { path } => write!(f, "file {}", path.display()),
            ActionSpec::Shell { argv } => write!(f, "shell {}", argv.join(" ")),
            ActionSpec::Emulator {
                emulator_id,
                config,
            } => {
                write!(f, "emulator {}", emulator_id)?;
                if !config.is_empty() {
                    let pairs: Vec<String> =
                        config.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    write!(f, " ({})", pairs.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Whether `target` has an `http://` or `https://` prefix.
pub fn is_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredAction {
    Emulator {
        emulator: String,
        #[serde(default)]
        config: BTreeMap<String, ArgValue>,
    },
    Command {
        command: String,
    },
    Hotkey {
        hotkey: StoredKeys,
    },
    Url {
        url: String,
    },
    File {
        file: PathBuf,
    },
    Shell {
        shell: StoredKeys,
    },
    Legacy(String),
}

/// A list, or a single string that older files used for the same field.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredKeys {
    List(Vec<String>),
    Line(String),
}

impl From<StoredAction> for ActionSpec {
    fn from(stored: StoredAction) -> Self {
        match stored {
            StoredAction::Emulator { emulator, config } => ActionSpec::Emulator {
                emulator_id: emulator,
                config,
            },
            StoredAction::Command { command } => ActionSpec::Command { name: command },
            StoredAction::Hotkey { hotkey } => ActionSpec::Hotkey {
                keys: match hotkey {
                    StoredKeys::List(keys) => keys,
                    StoredKeys::Line(line) => line
                        .split(['+', ','])
                        .map(|k| k.trim().to_lowercase())
                        .filter(|k| !k.is_empty())
                        .collect(),
                },
            },
            StoredAction::Url { url } => ActionSpec::Url { value: url },
            StoredAction::File { file } => ActionSpec::File { path: file },
            StoredAction::Shell { shell } => ActionSpec::Shell {
                argv: match shell {
                    StoredKeys::List(argv) => argv,
                    StoredKeys::Line(line) => split_command_line(&line),
                },
            },
            StoredAction::Legacy(value) => ActionSpec::from_legacy(&value),
        }
    }
}

impl From<ActionSpec> for StoredAction {
    fn from(spec: ActionSpec) -> Self {
        match spec {
            ActionSpec::Command { name } => StoredAction::Command { command: name },
            ActionSpec::Hotkey { keys } => StoredAction::Hotkey {
                hotkey: StoredKeys::List(keys),
            },
            ActionSpec::Url { value } => StoredAction::Url { url: value },
            ActionSpec::File { path } => StoredAction::File { file: path },
            ActionSpec::Shell { argv } => StoredAction::Shell {
                shell: StoredKeys::List(argv),
            },
            ActionSpec::Emulator {
                emulator_id,
                config,
            } => StoredAction::Emulator {
                emulator: emulator_id,
                config,
            },
        }
    }
}
