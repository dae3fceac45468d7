//! Manifests written by Storage next to downloaded input tables and files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sidecar of an input table (`in/tables/<file>.manifest`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTableManifest {
    /// Storage table id, e.g. `in.c-main.test`.
    pub id: String,
    /// Column names in file order.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Remaining storage metadata (`uri`, `name`, `created`, `metadata`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sidecar of an input file (`in/files/<file>.manifest`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredFileManifest {
    /// Storage file id.
    pub id: u64,
    /// Original file name.
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Remaining storage metadata (`created`, `size_bytes`, `is_public`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
