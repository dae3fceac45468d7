//! Configuration document schema (`config.json`).
//!
//! Every section is optional. Producers encode an empty mapping as `[]`
//! or `null` at times, so all sections go through [`lenient`] and fall
//! back to their default.

use kbc_types::{FileQuery, OutputFileDescriptor, TableDescriptor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Top-level component configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// User parameters of the component.
    #[serde(default, deserialize_with = "lenient")]
    pub parameters: Map<String, Value>,
    /// Synchronous action to run; empty for the default `run`.
    #[serde(default, deserialize_with = "lenient")]
    pub action: String,
    /// Input/output mapping.
    #[serde(default, deserialize_with = "lenient")]
    pub storage: StorageConfig,
    /// OAuth and other credentials.
    #[serde(default, deserialize_with = "lenient")]
    pub authorization: Map<String, Value>,
    /// Parameters configured on the component image itself.
    #[serde(default, deserialize_with = "lenient")]
    pub image_parameters: Map<String, Value>,
}

/// `storage` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub input: InputMapping,
    #[serde(default, deserialize_with = "lenient")]
    pub output: OutputMapping,
}

/// `storage.input` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputMapping {
    #[serde(default, deserialize_with = "lenient")]
    pub tables: Vec<TableDescriptor>,
    #[serde(default, deserialize_with = "lenient")]
    pub files: Vec<FileQuery>,
}

/// `storage.output` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputMapping {
    #[serde(default, deserialize_with = "lenient")]
    pub tables: Vec<TableDescriptor>,
    #[serde(default, deserialize_with = "lenient")]
    pub files: Vec<OutputFileDescriptor>,
}

/// Deserializes `T`, mapping `null` and `[]` to `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::Array(items) if items.is_empty() => Ok(T::default()),
        other => T::deserialize(other).map_err(serde::de::Error::custom),
    }
}
