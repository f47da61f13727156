use std::path::PathBuf;

use clap::Parser;

/// Launch emulators, files, URLs and shortcuts from proximity tags.
#[derive(Debug, Default, Parser)]
#[command(name = "tag-launcher", version, long_about = None)]
pub struct Cli {
    /// Serial port of the tag reader (overrides `serial.port`)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// Baud rate of the tag reader (overrides `serial.baud_rate`)
    #[arg(long, value_name = "BAUD")]
    pub baud: Option<u32>,

    /// Directory for the catalog and emulator files (overrides `storage.data_dir`)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}
