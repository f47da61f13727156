use crate::{CoreResult, action::KeyName};

use std::path::Path;

/// OS-level effects an action can have.
///
/// Implementations wrap input synthesis, the default URL/file handlers and
/// process spawning. Every method reports failure through
/// [`crate::CoreError::Capability`].
pub trait Desktop {
    /// Press `keys` together: modifiers held, last key clicked, released in reverse.
    fn press_chord(&mut self, keys: &[KeyName]) -> CoreResult<()>;

    /// Open `url` in the default browser.
    fn open_url(&mut self, url: &str) -> CoreResult<()>;

    /// Open `path` with its OS file association.
    fn open_path(&mut self, path: &Path) -> CoreResult<()>;

    /// Start `program` without waiting for it. Returns the child pid.
    fn spawn_detached(&mut self, program: &Path, args: &[String]) -> CoreResult<u32>;
}
