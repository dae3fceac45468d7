//! Table and file descriptors declared in `storage.input` / `storage.output`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A table mapping between Storage and a local CSV file.
///
/// For input tables `source` is the Storage table id and `destination` the
/// local file name; for output tables the roles are swapped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Storage table id (input) or local file name (output).
    #[serde(default)]
    pub source: String,
    /// Local file name (input) or Storage table id (output).
    #[serde(default)]
    pub destination: String,
    /// Remaining mapping options (`columns`, `where_column`, `incremental`, ...).
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl TableDescriptor {
    /// Local file name of an input table.
    ///
    /// Falls back to `<source>.csv` when no destination was configured.
    pub fn input_file_name(&self) -> String {
        if self.destination.is_empty() {
            format!("{}.csv", self.source)
        } else {
            self.destination.clone()
        }
    }

    /// Local file name of an output table.
    pub fn output_file_name(&self) -> &str {
        &self.source
    }
}

/// A declared table together with the absolute path of its local file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTable {
    /// The descriptor as found in the configuration.
    #[serde(flatten)]
    pub descriptor: TableDescriptor,
    /// Absolute path under `in/tables` or `out/tables`.
    pub full_path: PathBuf,
}

impl ResolvedTable {
    /// Storage table id or local file name, see [`TableDescriptor`].
    pub fn source(&self) -> &str {
        &self.descriptor.source
    }

    /// See [`TableDescriptor`].
    pub fn destination(&self) -> &str {
        &self.descriptor.destination
    }

    /// The final path component of `full_path`.
    pub fn file_name(&self) -> Option<&str> {
        self.full_path.file_name().and_then(|n| n.to_str())
    }
}

impl AsRef<Path> for ResolvedTable {
    fn as_ref(&self) -> &Path {
        &self.full_path
    }
}

/// A file query in `storage.input.files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileQuery {
    /// Tags the files must carry.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form search query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Only pick files produced by the parent run.
    #[serde(default)]
    pub filter_by_run_id: bool,
    /// Maximum number of files to download.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Any other keys of the query.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// A downloaded input file found in `in/files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    /// File name on disk (`<id>_<name>`).
    pub file_name: String,
    /// Absolute path under `in/files`.
    pub full_path: PathBuf,
}

impl AsRef<Path> for InputFile {
    fn as_ref(&self) -> &Path {
        &self.full_path
    }
}

/// An expected output file in `storage.output.files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputFileDescriptor {
    /// Local file name under `out/files`.
    #[serde(default)]
    pub source: String,
    /// Tags to assign when the file is uploaded.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_permanent: Option<bool>,
    /// Any other keys of the mapping.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// An expected output file with its resolved path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOutputFile {
    #[serde(flatten)]
    pub descriptor: OutputFileDescriptor,
    /// Absolute path under `out/files`.
    pub full_path: PathBuf,
}

impl ResolvedOutputFile {
    pub fn source(&self) -> &str {
        &self.descriptor.source
    }
}
