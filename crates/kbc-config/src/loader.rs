//! Data directory resolution (explicit path or env) and `config.json` loading.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::ConfigDocument;

/// Environment variable designating the data directory.
pub const DATA_DIR_ENV: &str = "KBC_DATADIR";

/// File name of the configuration document inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Settings read from the `KBC_` environment layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Data directory (`KBC_DATADIR`).
    #[serde(default)]
    pub datadir: Option<String>,
}

/// Loads settings by merging layers:
/// 1. Default values
/// 2. Environment variables (`KBC_` prefix)
///
/// The environment value is taken verbatim: a directory named `2024`,
/// `true` or `[x]` stays a string.
pub fn load_settings() -> Result<LoaderSettings, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(LoaderSettings::default()));
    if let Some(dir) = raw_env("datadir") {
        figment = figment.merge(Serialized::default("datadir", dir));
    }
    figment
        .extract()
        .map_err(|e| ConfigError::Environment(e.to_string()))
}

fn raw_env(key: &str) -> Option<String> {
    Env::prefixed("KBC_")
        .only(&[key])
        .iter()
        .find(|(name, _)| name.as_str().eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

/// Resolves the data directory.
///
/// An explicit, non-empty path wins; otherwise `KBC_DATADIR` is used.
///
/// # Errors
///
/// Returns `ConfigError::DataDirUnset` if neither yields a non-empty path.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    match load_settings()?.datadir {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => Err(ConfigError::DataDirUnset),
    }
}

/// Reads and parses `<data_dir>/config.json`.
///
/// # Errors
///
/// Returns `ConfigError::MissingConfig` if the file does not exist,
/// `ConfigError::Io` if it cannot be read and `ConfigError::Parse` if it
/// is not a valid configuration document.
pub fn load_document(data_dir: &Path) -> Result<ConfigDocument, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Err(ConfigError::MissingConfig {
            data_dir: data_dir.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
    let document: ConfigDocument =
        serde_json::from_str(&content).map_err(|e| ConfigError::parse(&path, e))?;
    tracing::debug!(
        path = %path.display(),
        action = %document.action,
        input_tables = document.storage.input.tables.len(),
        output_tables = document.storage.output.tables.len(),
        "configuration loaded"
    );
    Ok(document)
}
