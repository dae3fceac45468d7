//! Reads the sidecar manifests Storage places next to input tables and files.

use std::path::{Path, PathBuf};

use kbc_types::{StoredFileManifest, StoredTableManifest};
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Extension appended to an artifact path to form its sidecar.
pub const MANIFEST_EXTENSION: &str = "manifest";

/// Returns `<path>.manifest`.
pub fn manifest_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(MANIFEST_EXTENSION);
    PathBuf::from(name)
}

/// Returns `true` if the path looks like a sidecar manifest.
pub fn is_manifest(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == MANIFEST_EXTENSION)
}

/// Reads the manifest of an input table located at `table_path`.
///
/// # Errors
///
/// Returns `ConfigError::ManifestNotFound` if `<table_path>.manifest` is
/// missing and `ConfigError::Parse` if it is malformed.
pub fn read_table_manifest(table_path: &Path) -> Result<StoredTableManifest, ConfigError> {
    read_sidecar(&manifest_path(table_path))
}

/// Reads the manifest of an input file located at `file_path`.
///
/// # Errors
///
/// Same as [`read_table_manifest`].
pub fn read_file_manifest(file_path: &Path) -> Result<StoredFileManifest, ConfigError> {
    read_sidecar(&manifest_path(file_path))
}

fn read_sidecar<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::parse(path, e))
}
