use crate::config::{default_grace_period_secs, default_poll_interval_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Process and event loop timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Seconds a closing emulator gets before it is force killed.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    /// Milliseconds between polls of the serial port and the console.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ProcessConfig {
    pub(crate) fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    /// Never zero, so the loop cannot spin.
    pub(crate) fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
