use crate::config::default_record_last_scan;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the catalog, registry and preferences live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Write the most recent UID to `last_scan.txt`.
    #[serde(default = "default_record_last_scan")]
    pub record_last_scan: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            record_last_scan: default_record_last_scan(),
        }
    }
}
