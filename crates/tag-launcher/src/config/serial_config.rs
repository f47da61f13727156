use crate::config::{default_baud_rate, default_serial_port};

use serde::{Deserialize, Serialize};

/// Tag reader serial port configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port name, e.g. `COM9` or `/dev/ttyACM0`.
    #[serde(default = "default_serial_port")]
    pub port: String,
    /// Line speed of the reader firmware.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}
