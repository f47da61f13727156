use crate::{CoreResult, action::ActionType, session::CaptureMode, store};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Answers remembered between runs and offered as prompt defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Capture mode chosen by the last add flow.
    pub last_mode: Option<CaptureMode>,
    /// Action type chosen by the last add flow.
    pub last_action_type: Option<ActionType>,
    /// Directory of the last picked file.
    pub last_browse_dir: Option<PathBuf>,
}

impl Preferences {
    /// Load from `path`; a missing file yields defaults.
    #[track_caller]
    pub fn load(path: &Path) -> CoreResult<Self> {
        Ok(store::load_json(path)?.unwrap_or_default())
    }

    /// Persist to `path`.
    #[track_caller]
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        store::save_json(path, self)
    }

    /// Remember the directory containing `picked`.
    pub fn remember_browse_dir(&mut self, picked: &Path) {
        if let Some(parent) = picked.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_browse_dir = Some(parent.to_path_buf());
        }
    }
}
