use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// A key that can take part in a synthesized chord.
///
/// Names are parsed case-insensitively and accept the usual aliases
/// (`ctrl`/`control`, `win`/`meta`/`cmd`/`super`, `esc`/`escape`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// Control modifier.
    Control,
    /// Alt / Option modifier.
    Alt,
    /// Shift modifier.
    Shift,
    /// Windows / Command / Super modifier.
    Meta,
    /// Tab.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Print screen.
    PrintScreen,
    /// Function key F1–F20.
    Function(u8),
    /// A single printable character.
    Char(char),
}

impl KeyName {
    /// Whether this key is held while the rest of the chord is pressed.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyName::Control | KeyName::Alt | KeyName::Shift | KeyName::Meta
        )
    }

    /// Parse an ordered list of key names, rejecting empty chords.
    #[track_caller]
    pub fn parse_chord<S: AsRef<str>>(keys: &[S]) -> CoreResult<Vec<KeyName>> {
        if keys.is_empty() {
            return Err(CoreError::InvalidHotkey {
                reason: "no keys given".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        keys.iter()
            .map(|k| {
                k.as_ref()
                    .parse::<KeyName>()
                    .map_err(|reason| CoreError::InvalidHotkey {
                        reason,
                        location: ErrorLocation::from(Location::caller()),
                    })
            })
            .collect()
    }
}

impl FromStr for KeyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();

        let key = match name.as_str() {
            "ctrl" | "control" => KeyName::Control,
            "alt" | "option" => KeyName::Alt,
            "shift" => KeyName::Shift,
            "win" | "windows" | "meta" | "cmd" | "command" | "super" => KeyName::Meta,
            "tab" => KeyName::Tab,
            "enter" | "return" => KeyName::Enter,
            "esc" | "escape" => KeyName::Escape,
            "space" => KeyName::Space,
            "backspace" => KeyName::Backspace,
            "del" | "delete" => KeyName::Delete,
            "home" => KeyName::Home,
            "end" => KeyName::End,
            "pageup" | "pgup" => KeyName::PageUp,
            "pagedown" | "pgdn" => KeyName::PageDown,
            "up" => KeyName::Up,
            "down" => KeyName::Down,
            "left" => KeyName::Left,
            "right" => KeyName::Right,
            "printscreen" | "print_screen" | "prtsc" => KeyName::PrintScreen,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => KeyName::Char(c),
                    _ => match other.strip_prefix('f').map(str::parse::<u8>) {
                        Some(Ok(n)) if (1..=20).contains(&n) => KeyName::Function(n),
                        _ => return Err(format!("unknown key name '{}'", s.trim())),
                    },
                }
            }
        };

        Ok(key)
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyName::Control => f.write_str("ctrl"),
            KeyName::Alt => f.write_str("alt"),
            KeyName::Shift => f.write_str("shift"),
            KeyName::Meta => f.write_str("win"),
            KeyName::Tab => f.write_str("tab"),
            KeyName::Enter => f.write_str("enter"),
            KeyName::Escape => f.write_str("esc"),
            KeyName::Space => f.write_str("space"),
            KeyName::Backspace => f.write_str("backspace"),
            KeyName::Delete => f.write_str("delete"),
            KeyName::Home => f.write_str("home"),
            KeyName::End => f.write_str("end"),
            KeyName::PageUp => f.write_str("pageup"),
            KeyName::PageDown => f.write_str("pagedown"),
            KeyName::Up => f.write_str("up"),
            KeyName::Down => f.write_str("down"),
            KeyName::Left => f.write_str("left"),
            KeyName::Right => f.write_str("right"),
            KeyName::PrintScreen => f.write_str("printscreen"),
            KeyName::Function(n) => write!(f, "f{}", n),
            KeyName::Char(c) => write!(f, "{}", c),
        }
    }
}
