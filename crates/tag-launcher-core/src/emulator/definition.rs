use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Which running processes are closed before an emulator launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseOnLaunch {
    /// Close running instances of the same executable.
    Same,
    /// Close running instances of every other registered emulator.
    #[default]
    Others,
    /// Close nothing.
    None,
}

impl CloseOnLaunch {
    /// Every policy, in menu order.
    pub const ALL: [CloseOnLaunch; 3] = [
        CloseOnLaunch::Others,
        CloseOnLaunch::Same,
        CloseOnLaunch::None,
    ];

    /// Persisted name.
    pub fn as_str(self) -> &'static str {
        match self {
            CloseOnLaunch::Same => "same",
            CloseOnLaunch::Others => "others",
            CloseOnLaunch::None => "none",
        }
    }
}

/// How an argument's value is captured and emitted.
///
/// Arguments written without a type are free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    /// A path picked from disk.
    File,
    /// Free text.
    #[default]
    Text,
    /// One of a fixed set of values.
    Choice,
    /// A bare flag, present or absent.
    Toggle,
}

/// Concrete value for one argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Toggle state.
    Flag(bool),
    /// Numeric value written by hand into the definitions file.
    Number(serde_json::Number),
    /// Text, path or choice value.
    Text(String),
}

impl ArgValue {
    /// Truthiness used for toggles.
    ///
    /// Text counts as set unless it is empty, `false`, `0`, `no` or `off`.
    pub fn is_truthy(&self) -> bool {
        match self {
            ArgValue::Flag(b) => *b,
            ArgValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            ArgValue::Text(s) => !matches!(
                s.trim().to_lowercase().as_str(),
                "" | "false" | "0" | "no" | "off"
            ),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Flag(b) => write!(f, "{}", b),
            ArgValue::Number(n) => write!(f, "{}", n),
            ArgValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Flag(value)
    }
}

/// Declaration of one launch argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Key used in a tag's config mapping.
    pub name: String,

    /// Capture and emission rule.
    #[serde(rename = "type", default)]
    pub arg_type: ArgumentType,

    /// Flag token emitted before the value (or alone, for toggles).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,

    /// Whether the capture flow insists on a value.
    #[serde(default)]
    pub required: bool,

    /// Value offered by the capture flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgValue>,

    /// Allowed values for [`ArgumentType::Choice`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Prompt label; falls back to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Longer help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSpec {
    /// Non-empty flag, if any.
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref().filter(|f| !f.trim().is_empty())
    }

    /// Prompt label.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A launchable external program and its argument schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmulatorDefinition {
    /// Name shown to the operator. Empty in the file means the registry id.
    #[serde(rename = "name", default)]
    pub display_name: String,

    /// Location of the binary. Only checked at launch time.
    #[serde(rename = "executable")]
    pub executable_path: PathBuf,

    /// Close policy applied before launch.
    #[serde(default)]
    pub close_on_launch: CloseOnLaunch,

    /// Arguments in emission order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

impl EmulatorDefinition {
    /// Definition with no arguments and the default close policy.
    pub fn new(display_name: impl Into<String>, executable_path: impl Into<PathBuf>) -> Self {
        Self {
            display_name: display_name.into(),
            executable_path: executable_path.into(),
            close_on_launch: CloseOnLaunch::default(),
            arguments: Vec::new(),
        }
    }
}
