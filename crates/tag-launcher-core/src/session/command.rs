/// Keyboard commands accepted between prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// `a`: bind tags to an action.
    Add,
    /// `d`: delete saved tags.
    Delete,
    /// `e`: register or update an emulator.
    RegisterEmulator,
    /// `q`: quit.
    Quit,
    /// `done`: leave batch mode, or abandon a pending single add.
    Done,
}

impl OperatorCommand {
    /// Parse a trimmed, case-insensitive command line. Anything else is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "a" => Some(OperatorCommand::Add),
            "d" => Some(OperatorCommand::Delete),
            "e" => Some(OperatorCommand::RegisterEmulator),
            "q" => Some(OperatorCommand::Quit),
            "done" => Some(OperatorCommand::Done),
            _ => None,
        }
    }
}
