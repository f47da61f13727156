mod config;
mod process_config;
mod serial_config;
mod storage_config;

pub(crate) use {
    config::Config, process_config::ProcessConfig, serial_config::SerialConfig,
    storage_config::StorageConfig,
};

#[cfg(target_os = "windows")]
pub(crate) const DEFAULT_SERIAL_PORT: &str = "COM9";
#[cfg(not(target_os = "windows"))]
pub(crate) const DEFAULT_SERIAL_PORT: &str = "/dev/ttyACM0";
pub(crate) const DEFAULT_BAUD_RATE: u32 = 115_200;
pub(crate) const DEFAULT_GRACE_PERIOD_SECS: u64 = 3;
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
pub(crate) const DEFAULT_RECORD_LAST_SCAN: bool = true;

pub(crate) fn default_serial_port() -> String {
    DEFAULT_SERIAL_PORT.to_string()
}

pub(crate) fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

pub(crate) fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD_SECS
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

pub(crate) fn default_record_last_scan() -> bool {
    DEFAULT_RECORD_LAST_SCAN
}
