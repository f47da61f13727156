use crate::{protocol::Pump, session::OperatorCommand};

use std::path::{Path, PathBuf};

/// The human at the keyboard.
///
/// Prompts block until answered and return `None` when cancelled. While a
/// prompt waits it must call `pump.pump()` regularly so scans keep being
/// read into the mailbox.
pub trait Operator {
    /// Next command typed between prompts, if any. Never blocks.
    fn next_command(&mut self) -> Option<OperatorCommand>;

    /// Show a message.
    fn notify(&mut self, message: &str);

    /// Yes/no question. Cancel counts as no.
    fn confirm(&mut self, pump: &mut dyn Pump, question: &str) -> bool;

    /// Pick one option by index.
    fn choose(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Option<usize>;

    /// Pick any number of options by index.
    fn choose_many(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        options: &[String],
    ) -> Option<Vec<usize>>;

    /// Free text, falling back to `default` on an empty answer.
    fn ask_text(
        &mut self,
        pump: &mut dyn Pump,
        label: &str,
        default: Option<&str>,
    ) -> Option<String>;

    /// A file path, browsing from `start_dir`.
    fn pick_file(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        start_dir: Option<&Path>,
    ) -> Option<PathBuf>;
}
