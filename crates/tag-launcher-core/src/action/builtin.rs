use crate::action::KeyName;

/// Named desktop commands a tag can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    /// Close the focused window.
    CloseWindow,
    /// Switch to the previous window.
    SwitchWindow,
    /// Minimize everything and show the desktop.
    ShowDesktop,
    /// Lock the session.
    LockScreen,
    /// Hard-refresh the current browser page.
    RefreshPage,
    /// Open a private browser window.
    OpenIncognito,
    /// Capture the screen with the OS screenshot key.
    Screenshot,
}

impl BuiltinCommand {
    /// Every built-in, in menu order.
    pub const ALL: [BuiltinCommand; 7] = [
        BuiltinCommand::CloseWindow,
        BuiltinCommand::SwitchWindow,
        BuiltinCommand::ShowDesktop,
        BuiltinCommand::LockScreen,
        BuiltinCommand::RefreshPage,
        BuiltinCommand::OpenIncognito,
        BuiltinCommand::Screenshot,
    ];

    /// Persisted name.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinCommand::CloseWindow => "close_window",
            BuiltinCommand::SwitchWindow => "switch_window",
            BuiltinCommand::ShowDesktop => "show_desktop",
            BuiltinCommand::LockScreen => "lock_screen",
            BuiltinCommand::RefreshPage => "refresh_page",
            BuiltinCommand::OpenIncognito => "open_incognito",
            BuiltinCommand::Screenshot => "screenshot",
        }
    }

    /// Look up a built-in by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Key chord that performs the command.
    pub fn chord(self) -> Vec<KeyName> {
        match self {
            BuiltinCommand::CloseWindow => vec![KeyName::Alt, KeyName::Function(4)],
            BuiltinCommand::SwitchWindow => vec![KeyName::Alt, KeyName::Tab],
            BuiltinCommand::ShowDesktop => vec![KeyName::Meta, KeyName::Char('d')],
            BuiltinCommand::LockScreen => vec![KeyName::Meta, KeyName::Char('l')],
            BuiltinCommand::RefreshPage => {
                vec![KeyName::Control, KeyName::Shift, KeyName::Char('r')]
            }
            BuiltinCommand::OpenIncognito => {
                vec![KeyName::Control, KeyName::Shift, KeyName::Char('n')]
            }
            BuiltinCommand::Screenshot => vec![KeyName::PrintScreen],
        }
    }
}
