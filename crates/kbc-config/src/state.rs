//! Component state persisted between runs.
//!
//! The previous state is read from `in/state.json`; the new state is
//! written to `out/state.json`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::ConfigError;

const STATE_FILE: &str = "state.json";

/// Path of the incoming state file.
pub fn input_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("in").join(STATE_FILE)
}

/// Path of the outgoing state file.
pub fn output_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("out").join(STATE_FILE)
}

/// Reads `in/state.json`, returning an empty mapping if it does not exist.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if the file is not a JSON object.
pub fn read_state(data_dir: &Path) -> Result<Map<String, Value>, ConfigError> {
    let path = input_state_path(data_dir);
    if !path.is_file() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&content).map_err(|e| ConfigError::parse(&path, e))
}

/// Writes `out/state.json`, creating `out/` if needed.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be written.
pub fn write_state(data_dir: &Path, state: &Map<String, Value>) -> Result<PathBuf, ConfigError> {
    let path = output_state_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    let body = serde_json::to_string(state).map_err(|e| ConfigError::serialize(&path, e))?;
    std::fs::write(&path, body).map_err(|e| ConfigError::io(&path, e))?;
    tracing::info!(path = %path.display(), keys = state.len(), "state written");
    Ok(path)
}
