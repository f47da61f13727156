use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Kind of action captured by the interactive add flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Launch a registered emulator.
    Emulator,
    /// Open a file with its associated program.
    File,
    /// Open a URL.
    Url,
    /// Run a built-in command.
    Command,
    /// Press a key chord.
    Hotkey,
    /// Spawn a program from argv.
    Shell,
}

impl ActionType {
    /// Every type, in menu order.
    pub const ALL: [ActionType; 6] = [
        ActionType::Emulator,
        ActionType::File,
        ActionType::Url,
        ActionType::Command,
        ActionType::Hotkey,
        ActionType::Shell,
    ];

    /// Persisted name.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Emulator => "emulator",
            ActionType::File => "file",
            ActionType::Url => "url",
            ActionType::Command => "command",
            ActionType::Hotkey => "hotkey",
            ActionType::Shell => "shell",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ActionType::Emulator => "Emulator",
            ActionType::File => "File",
            ActionType::Url => "URL",
            ActionType::Command => "Command",
            ActionType::Hotkey => "Hotkey",
            ActionType::Shell => "Shell Command",
        }
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown action type '{}'", s))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
