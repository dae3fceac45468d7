//! Writes output manifests (`<path>.manifest`).
//!
//! Arguments are validated into an immutable record first; the sidecar is
//! only touched once validation has succeeded.

use std::path::{Path, PathBuf};

use kbc_types::{FileManifest, FileManifestArgs, TableManifest, TableManifestArgs};
use serde::Serialize;

use crate::error::ConfigError;
use crate::manifest_loader::manifest_path;

/// Validates `args` and writes the file manifest for `path`.
///
/// Returns the path of the written sidecar. An existing sidecar is
/// overwritten.
///
/// # Errors
///
/// Returns `ConfigError::InvalidManifest` if `args.tags` is not a list of
/// strings, `ConfigError::Io` if the sidecar cannot be written.
pub fn write_file_manifest(path: &Path, args: FileManifestArgs) -> Result<PathBuf, ConfigError> {
    let manifest = FileManifest::try_from(args)?;
    write_sidecar(path, &manifest)
}

/// Validates `args` and writes the table manifest for `path`.
///
/// Only supplied fields are emitted. `delete_where` is flattened into
/// `delete_where_column`, `delete_where_values` and `delete_where_operator`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidManifest` with kind `InvalidType` or
/// `InvalidValue` on malformed arguments, `ConfigError::Io` on write
/// failure.
pub fn write_table_manifest(
    path: &Path,
    args: TableManifestArgs,
) -> Result<PathBuf, ConfigError> {
    let manifest = TableManifest::try_from(args)?;
    write_sidecar(path, &manifest)
}

fn write_sidecar<T: Serialize>(path: &Path, manifest: &T) -> Result<PathBuf, ConfigError> {
    let target = manifest_path(path);
    let body =
        serde_json::to_string_pretty(manifest).map_err(|e| ConfigError::serialize(&target, e))?;
    std::fs::write(&target, body).map_err(|e| ConfigError::io(&target, e))?;
    tracing::info!(path = %target.display(), "manifest written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn read(path: &Path) -> Value {
        let content = std::fs::read_to_string(path).expect("read");
        serde_json::from_str(&content).expect("json")
    }

    #[test]
    fn file_manifest_written_next_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("someFile.txt");
        let written = write_file_manifest(
            &file,
            FileManifestArgs::new()
                .tags(vec!["foo", "bar"])
                .is_public(true)
                .is_permanent(false)
                .notify(true),
        )
        .expect("write");
        assert_eq!(written, dir.path().join("someFile.txt.manifest"));
        assert_eq!(
            read(&written),
            json!({"tags": ["foo", "bar"], "is_public": true, "is_permanent": false, "notify": true})
        );
    }

    #[test]
    fn existing_manifest_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = dir.path().join("t.csv");
        write_table_manifest(&table, TableManifestArgs::new().columns(vec!["a"])).expect("write");
        let written =
            write_table_manifest(&table, TableManifestArgs::new().incremental(true)).expect("write");
        assert_eq!(read(&written), json!({"incremental": true}));
    }

    #[test]
    fn invalid_args_leave_existing_manifest_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = dir.path().join("t.csv");
        let written =
            write_table_manifest(&table, TableManifestArgs::new().columns(vec!["a"])).expect("write");
        let err = write_table_manifest(&table, TableManifestArgs::new().columns("a")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidManifest(_)));
        assert_eq!(read(&written), json!({"columns": ["a"]}));
    }

    #[test]
    fn unencodable_value_is_internal_and_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("t.csv");
        let mut bad = std::collections::BTreeMap::new();
        bad.insert(vec![1u8], 1u8);
        let err = write_sidecar(&file, &bad).unwrap_err();
        assert!(matches!(err, ConfigError::Serialize { .. }), "{err}");
        assert_eq!(err.kind(), kbc_types::ErrorKind::Internal);
        assert!(!dir.path().join("t.csv.manifest").exists());
    }

    #[test]
    fn unwritable_location_is_io_error() {
        let err = write_file_manifest(
            Path::new("/nonexistent/dir/file.txt"),
            FileManifestArgs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
