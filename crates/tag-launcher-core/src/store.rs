//! Whole-file JSON persistence with atomic replacement.
//!
//! Every save writes a sibling temp file, syncs it, then renames it over the
//! target so a crash never leaves a half-written document behind.

use crate::{CoreError, CoreResult};

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

/// Load a JSON document, returning `None` when the file does not exist.
#[track_caller]
#[instrument]
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CoreResult<Option<T>> {
    if !path.exists() {
        debug!(path = ?path, "No file on disk");
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| CoreError::persistence(path, format!("Failed to read: {}", e)))?;

    if contents.trim().is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(&contents)
        .map_err(|e| CoreError::persistence(path, format!("Failed to parse: {}", e)))?;

    Ok(Some(value))
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
#[track_caller]
#[instrument(skip(value))]
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let contents = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::persistence(path, format!("Failed to serialize: {}", e)))?;

    write_atomic(path, contents.as_bytes())
}

/// Atomically replace `path` with `bytes`.
#[track_caller]
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::persistence(path, format!("Failed to create directory: {}", e))
        })?;
    }

    let temp_path = temp_path_for(path);

    let mut temp_file = fs::File::create(&temp_path)
        .map_err(|e| CoreError::persistence(path, format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(bytes)
        .map_err(|e| CoreError::persistence(path, format!("Failed to write temp file: {}", e)))?;

    temp_file
        .sync_all()
        .map_err(|e| CoreError::persistence(path, format!("Failed to sync temp file: {}", e)))?;

    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CoreError::persistence(path, format!("Failed to rename temp file: {}", e))
    })?;

    debug!(path = ?path, bytes = bytes.len(), "File saved (atomic write)");

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
