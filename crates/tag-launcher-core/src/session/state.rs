use crate::action::ActionType;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the session controller is in its add/delete/register flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Scans dispatch their bound actions.
    Idle,
    /// Choosing single or batch capture.
    AwaitingMode,
    /// Choosing the action type to capture.
    AwaitingType,
    /// Waiting for the one tag a single-mode add binds.
    AwaitingScan,
    /// Collecting the action value (or emulator arguments) for a scanned tag.
    AwaitingConfig,
    /// Every scan binds the batch action until `done`.
    BatchActive,
}

/// Whether an add flow binds one tag or keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Bind the next scanned tag, then return to idle.
    Single,
    /// Bind every scanned tag until `done`.
    Batch,
}

impl CaptureMode {
    /// Every mode, in menu order.
    pub const ALL: [CaptureMode; 2] = [CaptureMode::Single, CaptureMode::Batch];
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Single => f.write_str("Single tag"),
            CaptureMode::Batch => f.write_str("Batch (until done)"),
        }
    }
}

/// The action type (and emulator, when relevant) an add flow captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    /// Type of action to capture.
    pub action_type: ActionType,
    /// Emulator chosen before the scan, for [`ActionType::Emulator`].
    pub emulator_id: Option<String>,
}

/// Transient controller state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Current mode.
    pub mode: SessionMode,
    /// Capture applied to every scan while [`SessionMode::BatchActive`].
    pub batch_action: Option<CaptureTarget>,
    /// Capture waiting for its tag while [`SessionMode::AwaitingScan`].
    pub pending_capture: Option<CaptureTarget>,
}

impl SessionState {
    /// Back to [`SessionMode::Idle`], forgetting any capture in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: SessionMode::Idle,
            batch_action: None,
            pending_capture: None,
        }
    }
}
