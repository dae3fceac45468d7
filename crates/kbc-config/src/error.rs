//! Adapter-level error types.

use std::path::PathBuf;

use kbc_types::{DiagnosticError, ErrorKind, KbcError};
use thiserror::Error;

/// Errors from loading a data directory and reading or writing its files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither an explicit path nor `KBC_DATADIR` was provided.
    #[error("Configuration file config.json not found, data directory is not set")]
    DataDirUnset,
    /// `config.json` is missing from the data directory.
    #[error(
        "Configuration file config.json not found, verify that the data directory is correct. Dir: {}",
        .data_dir.display()
    )]
    MissingConfig { data_dir: PathBuf },
    /// A file could not be read or written.
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A JSON file is malformed or has the wrong structure.
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be encoded as JSON.
    #[error("cannot serialize '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The environment layer could not be extracted.
    #[error("environment error: {0}")]
    Environment(String),
    /// The table is not declared in `storage.input.tables`.
    #[error("table '{name}' is not declared among input tables")]
    TableNotFound { name: String },
    /// The file is not present in `in/files`.
    #[error("file '{name}' is not among input files")]
    FileNotFound { name: String },
    /// The declared artifact has no sidecar manifest on disk.
    #[error("manifest not found: {}", .path.display())]
    ManifestNotFound { path: PathBuf },
    /// Output manifest arguments failed validation.
    #[error("invalid manifest: {0}")]
    InvalidManifest(#[from] KbcError),
    /// CSV reader or writer failure.
    #[error("csv error in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ConfigError {
    /// Classifies the error into a domain [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataDirUnset | Self::MissingConfig { .. } | Self::Environment(_) => {
                ErrorKind::Setup
            }
            Self::Parse { .. } => ErrorKind::InvalidValue,
            Self::TableNotFound { .. }
            | Self::FileNotFound { .. }
            | Self::ManifestNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidManifest(e) => e.kind,
            Self::Io { .. } | Self::Serialize { .. } | Self::Csv { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfigError> for KbcError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidManifest(inner) => inner,
            other => KbcError::new(other.kind(), other.to_string()),
        }
    }
}

impl DiagnosticError for ConfigError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::DataDirUnset => {
                Some("No data directory was passed and KBC_DATADIR is empty.".into())
            }
            Self::MissingConfig { data_dir } => Some(format!(
                "'{}' does not contain a config.json file.",
                data_dir.display()
            )),
            Self::Parse { .. } => Some("The file is not valid JSON or has an unexpected shape.".into()),
            Self::TableNotFound { name } => Some(format!(
                "No entry in storage.input.tables has destination '{name}'."
            )),
            Self::ManifestNotFound { .. } => {
                Some("The artifact is declared but its .manifest sidecar is missing.".into())
            }
            Self::InvalidManifest(e) => e.hint(),
            _ => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::DataDirUnset => {
                Some("Pass --data-dir or export KBC_DATADIR=/data before running.".into())
            }
            Self::MissingConfig { .. } => {
                Some("Point KBC_DATADIR at the directory holding config.json.".into())
            }
            Self::TableNotFound { .. } => Some(
                "Add the table to config.json:\n  storage.input.tables[] = {\"source\": ..., \"destination\": ...}"
                    .into(),
            ),
            _ => None,
        }
    }
}
