//! Output manifest records and their validating constructors.
//!
//! Callers describe output artifacts with loosely-typed arguments
//! ([`FileManifestArgs`], [`TableManifestArgs`]) holding raw JSON values.
//! `TryFrom` turns them into immutable records ([`FileManifest`],
//! [`TableManifest`]) or fails with an `InvalidType` / `InvalidValue`
//! error. Only a fully validated record is ever serialized.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KbcError;

// ---------------------------------------------------------------------------
// File manifest
// ---------------------------------------------------------------------------

/// Arguments for a file manifest, prior to validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileManifestArgs {
    /// Must be a JSON array of strings.
    pub tags: Value,
    pub is_public: bool,
    pub is_permanent: bool,
    pub notify: bool,
}

impl Default for FileManifestArgs {
    fn default() -> Self {
        Self {
            tags: Value::Array(Vec::new()),
            is_public: false,
            is_permanent: true,
            notify: false,
        }
    }
}

impl FileManifestArgs {
    /// Starts from the defaults: no tags, private, permanent, no notification.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(mut self, tags: impl Into<Value>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn is_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn is_permanent(mut self, is_permanent: bool) -> Self {
        self.is_permanent = is_permanent;
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }
}

/// Validated content of an output file manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    tags: Vec<String>,
    is_public: bool,
    is_permanent: bool,
    notify: bool,
}

impl FileManifest {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_permanent(&self) -> bool {
        self.is_permanent
    }

    pub fn notify(&self) -> bool {
        self.notify
    }
}

impl TryFrom<FileManifestArgs> for FileManifest {
    type Error = KbcError;

    fn try_from(args: FileManifestArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            tags: string_list("file_tags", args.tags)?,
            is_public: args.is_public,
            is_permanent: args.is_permanent,
            notify: args.notify,
        })
    }
}

// ---------------------------------------------------------------------------
// Table manifest
// ---------------------------------------------------------------------------

/// Arguments for a table manifest, prior to validation.
///
/// Every field is optional; only supplied fields end up in the manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableManifestArgs {
    /// Must be a string.
    pub destination: Option<Value>,
    /// Must be an array of strings.
    pub primary_key: Option<Value>,
    /// Must be an array of strings.
    pub columns: Option<Value>,
    pub incremental: Option<bool>,
    /// Must be an object of `key -> value`.
    pub metadata: Option<Value>,
    /// Must be an object of `column -> { key -> value }`.
    pub column_metadata: Option<Value>,
    /// Must be an object with `column`, `values` and optional `operator`.
    pub delete_where: Option<Value>,
}

impl TableManifestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, destination: impl Into<Value>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<Value>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn columns(mut self, columns: impl Into<Value>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = Some(incremental);
        self
    }

    pub fn metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn column_metadata(mut self, column_metadata: impl Into<Value>) -> Self {
        self.column_metadata = Some(column_metadata.into());
        self
    }

    pub fn delete_where(mut self, delete_where: impl Into<Value>) -> Self {
        self.delete_where = Some(delete_where.into());
        self
    }
}

/// A single `{key, value}` metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: Value,
}

/// Comparison used by a delete-where clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOperator {
    #[default]
    Eq,
    Ne,
}

impl DeleteOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
        }
    }
}

impl fmt::Display for DeleteOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeleteOperator {
    type Err = KbcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            other => Err(KbcError::invalid_type(format!(
                "delete_where operator must be 'eq' or 'ne', got '{other}'"
            ))),
        }
    }
}

/// Rows to delete from the destination table before an incremental load.
///
/// Serialized flat into the table manifest as `delete_where_*` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteWhere {
    #[serde(rename = "delete_where_column")]
    pub column: String,
    #[serde(rename = "delete_where_values")]
    pub values: Vec<String>,
    #[serde(rename = "delete_where_operator", default)]
    pub operator: DeleteOperator,
}

/// Validated content of an output table manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    incremental: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Vec<MetadataEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column_metadata: Option<BTreeMap<String, Vec<MetadataEntry>>>,
    #[serde(flatten)]
    delete_where: Option<DeleteWhere>,
}

impl TableManifest {
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn incremental(&self) -> Option<bool> {
        self.incremental
    }

    pub fn metadata(&self) -> Option<&[MetadataEntry]> {
        self.metadata.as_deref()
    }

    pub fn column_metadata(&self) -> Option<&BTreeMap<String, Vec<MetadataEntry>>> {
        self.column_metadata.as_ref()
    }

    pub fn delete_where(&self) -> Option<&DeleteWhere> {
        self.delete_where.as_ref()
    }
}

impl TryFrom<TableManifestArgs> for TableManifest {
    type Error = KbcError;

    fn try_from(args: TableManifestArgs) -> Result<Self, Self::Error> {
        let destination = args
            .destination
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(KbcError::invalid_type(format!(
                    "destination must be a string, got {}",
                    type_name(&other)
                ))),
            })
            .transpose()?;
        let primary_key = args
            .primary_key
            .map(|v| string_list("primary_key", v))
            .transpose()?;
        let columns = args.columns.map(|v| string_list("columns", v)).transpose()?;
        let metadata = args
            .metadata
            .map(|v| metadata_list("metadata", v))
            .transpose()?;
        let column_metadata = args.column_metadata.map(column_metadata).transpose()?;
        let delete_where = args.delete_where.map(delete_where).transpose()?;

        Ok(Self {
            destination,
            primary_key,
            columns,
            incremental: args.incremental,
            metadata,
            column_metadata,
            delete_where,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

fn string_list(field: &str, value: Value) -> Result<Vec<String>, KbcError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(KbcError::invalid_type(format!(
                "{field} must be a list of strings, got {}",
                type_name(&other)
            )))
        }
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(KbcError::invalid_type(format!(
                "{field} must contain only strings, found {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn metadata_list(field: &str, value: Value) -> Result<Vec<MetadataEntry>, KbcError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(KbcError::invalid_type(format!(
                "{field} must be a mapping, got {}",
                type_name(&other)
            )))
        }
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| MetadataEntry { key, value })
        .collect())
}

fn column_metadata(value: Value) -> Result<BTreeMap<String, Vec<MetadataEntry>>, KbcError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(KbcError::invalid_type(format!(
                "column_metadata must be a mapping, got {}",
                type_name(&other)
            )))
        }
    };
    map.into_iter()
        .map(|(column, inner)| {
            if !inner.is_object() {
                return Err(KbcError::invalid_type(format!(
                    "column_metadata['{column}'] must be a mapping, got {}",
                    type_name(&inner)
                )));
            }
            let entries = metadata_list("column_metadata", inner)?;
            Ok((column, entries))
        })
        .collect()
}

fn delete_where(value: Value) -> Result<DeleteWhere, KbcError> {
    let mut clause = match value {
        Value::Object(clause) => clause,
        other => {
            return Err(KbcError::invalid_type(format!(
                "delete_where must be a mapping, got {}",
                type_name(&other)
            )))
        }
    };
    let (Some(column), Some(values)) = (clause.remove("column"), clause.remove("values")) else {
        return Err(KbcError::invalid_value(
            "delete_where must contain the keys 'column' and 'values'",
        ));
    };
    let values = string_list("delete_where values", values)?;
    let operator = match clause.remove("operator") {
        None | Some(Value::Null) => DeleteOperator::default(),
        Some(Value::String(op)) => op.parse()?,
        Some(other) => {
            return Err(KbcError::invalid_type(format!(
                "delete_where operator must be a string, got {}",
                type_name(&other)
            )))
        }
    };
    let column = match column {
        Value::String(column) => column,
        other => {
            return Err(KbcError::invalid_type(format!(
                "delete_where column must be a string, got {}",
                type_name(&other)
            )))
        }
    };
    Ok(DeleteWhere {
        column,
        values,
        operator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(args: TableManifestArgs) -> Result<Value, KbcError> {
        let manifest = TableManifest::try_from(args)?;
        Ok(serde_json::to_value(&manifest).expect("serialize"))
    }

    #[test]
    fn file_manifest_defaults() {
        let m = FileManifest::try_from(FileManifestArgs::new()).expect("valid");
        assert!(m.tags().is_empty());
        assert!(!m.is_public());
        assert!(m.is_permanent());
        assert!(!m.notify());
    }

    #[test]
    fn file_manifest_rejects_string_tags() {
        let err = FileManifest::try_from(FileManifestArgs::new().tags("foo")).unwrap_err();
        assert!(err.is_type_error());
        assert!(err.message.contains("file_tags"));
    }

    #[test]
    fn file_manifest_rejects_non_string_tag() {
        let err = FileManifest::try_from(FileManifestArgs::new().tags(json!(["a", 1])))
            .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn empty_args_serialize_to_empty_object() {
        assert_eq!(build(TableManifestArgs::new()).expect("valid"), json!({}));
    }

    #[test]
    fn primary_key_only() {
        let v = build(TableManifestArgs::new().primary_key(vec!["foo", "bar"])).expect("valid");
        assert_eq!(v, json!({"primary_key": ["foo", "bar"]}));
    }

    #[test]
    fn metadata_preserves_caller_order() {
        let v = build(TableManifestArgs::new().metadata(json!({"zeta": 1, "alpha": "x"})))
            .expect("valid");
        assert_eq!(
            v["metadata"],
            json!([{"key": "zeta", "value": 1}, {"key": "alpha", "value": "x"}])
        );
    }

    #[test]
    fn bare_string_rejected_for_lists() {
        assert!(build(TableManifestArgs::new().primary_key("id"))
            .unwrap_err()
            .is_type_error());
        assert!(build(TableManifestArgs::new().columns("id"))
            .unwrap_err()
            .is_type_error());
    }

    #[test]
    fn destination_must_be_string() {
        let err = build(TableManifestArgs::new().destination(vec!["a", "b"])).unwrap_err();
        assert!(err.is_type_error());
        assert!(err.message.contains("a list"));
    }

    #[test]
    fn column_metadata_of_scalars_rejected() {
        let err = build(TableManifestArgs::new().column_metadata(json!({"a": "b"}))).unwrap_err();
        assert!(err.is_type_error());
        assert!(err.message.contains("column_metadata['a']"));
    }

    #[test]
    fn delete_where_default_operator_is_eq() {
        let v = build(
            TableManifestArgs::new().delete_where(json!({"column": "c", "values": ["1"]})),
        )
        .expect("valid");
        assert_eq!(v["delete_where_operator"], "eq");
        assert_eq!(v["delete_where_column"], "c");
    }

    #[test]
    fn delete_where_ne_operator() {
        let v = build(TableManifestArgs::new().delete_where(
            json!({"column": "c", "values": ["1"], "operator": "ne"}),
        ))
        .expect("valid");
        assert_eq!(v["delete_where_operator"], "ne");
    }

    #[test]
    fn delete_where_missing_keys_is_value_error() {
        let err = build(TableManifestArgs::new().delete_where(json!({"a": "b"}))).unwrap_err();
        assert!(err.is_value_error());
        let err = build(TableManifestArgs::new().delete_where(json!({"column": "a"}))).unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn delete_where_non_list_values_is_type_error() {
        let err = build(
            TableManifestArgs::new().delete_where(json!({"column": "a", "values": "b"})),
        )
        .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn delete_where_bad_operator_is_type_error() {
        let err = build(TableManifestArgs::new().delete_where(
            json!({"column": "a", "values": ["b"], "operator": "gt"}),
        ))
        .unwrap_err();
        assert!(err.is_type_error());
        assert!(err.message.contains("'gt'"));
    }

    #[test]
    fn delete_where_not_a_mapping_is_type_error() {
        let err = build(TableManifestArgs::new().delete_where(json!(["a"]))).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn operator_parse_and_display() {
        assert_eq!("ne".parse::<DeleteOperator>().expect("parse"), DeleteOperator::Ne);
        assert_eq!(DeleteOperator::Eq.to_string(), "eq");
        assert!("EQ".parse::<DeleteOperator>().is_err());
    }

    #[test]
    fn manifest_deserializes_back() {
        let v = json!({
            "primary_key": ["id"],
            "delete_where_column": "c",
            "delete_where_values": ["x"],
            "delete_where_operator": "ne"
        });
        let m: TableManifest = serde_json::from_value(v).expect("parse");
        assert_eq!(m.primary_key(), Some(&["id".to_string()][..]));
        let dw = m.delete_where().expect("clause");
        assert_eq!(dw.operator, DeleteOperator::Ne);
    }
}
