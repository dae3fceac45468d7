//! `kbc table-manifest` command.
//!
//! Builds table manifest arguments from flags and/or a raw JSON object
//! (`--args`), validates them and writes `<path>.manifest`. Flags take
//! precedence over keys in `--args`.

use std::path::PathBuf;

use clap::Args;
use kbc_types::TableManifestArgs;
use serde_json::{Map, Value};

use crate::output;

/// Write a manifest for an output table.
#[derive(Debug, Args)]
pub struct TableManifestCmdArgs {
    /// Path of the output table file (the manifest is written next to it).
    pub path: PathBuf,

    /// Manifest arguments as a JSON object.
    #[arg(long = "args")]
    pub raw: Option<String>,

    /// Destination table id in Storage.
    #[arg(long)]
    pub destination: Option<String>,

    /// Primary key columns (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub primary_key: Vec<String>,

    /// Column names (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Load incrementally instead of replacing the table.
    #[arg(long)]
    pub incremental: bool,

    /// Table metadata as KEY=VALUE (repeatable).
    #[arg(long)]
    pub metadata: Vec<String>,

    /// Column to match rows to delete before loading.
    #[arg(long)]
    pub delete_where_column: Option<String>,

    /// Values of the delete-where column (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub delete_where_values: Vec<String>,

    /// Delete-where comparison: eq or ne.
    #[arg(long)]
    pub delete_where_operator: Option<String>,
}

/// Executes the table-manifest command.
pub fn execute(args: &TableManifestCmdArgs) -> anyhow::Result<()> {
    let manifest_args = build_args(args)?;
    let written = kbc_config::write_table_manifest(&args.path, manifest_args)?;
    output::print_success(&format!("manifest written to {}", written.display()));
    Ok(())
}

fn build_args(args: &TableManifestCmdArgs) -> anyhow::Result<TableManifestArgs> {
    let mut manifest = match &args.raw {
        Some(raw) => args_from_json(raw)?,
        None => TableManifestArgs::new(),
    };
    if let Some(destination) = &args.destination {
        manifest = manifest.destination(destination.as_str());
    }
    if !args.primary_key.is_empty() {
        manifest = manifest.primary_key(args.primary_key.clone());
    }
    if !args.columns.is_empty() {
        manifest = manifest.columns(args.columns.clone());
    }
    if args.incremental {
        manifest = manifest.incremental(true);
    }
    if !args.metadata.is_empty() {
        let mut metadata = Map::new();
        for pair in &args.metadata {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("metadata must be KEY=VALUE, got '{pair}'"))?;
            metadata.insert(key.to_string(), Value::from(value));
        }
        manifest = manifest.metadata(metadata);
    }
    if let Some(column) = &args.delete_where_column {
        let mut clause = Map::new();
        clause.insert("column".into(), Value::from(column.as_str()));
        clause.insert("values".into(), Value::from(args.delete_where_values.clone()));
        if let Some(operator) = &args.delete_where_operator {
            clause.insert("operator".into(), Value::from(operator.as_str()));
        }
        manifest = manifest.delete_where(clause);
    }
    Ok(manifest)
}

/// Maps a raw JSON object onto manifest arguments without validating values.
fn args_from_json(raw: &str) -> anyhow::Result<TableManifestArgs> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid JSON in --args: {e}"))?;
    let Value::Object(fields) = value else {
        anyhow::bail!("--args must be a JSON object");
    };
    let mut manifest = TableManifestArgs::new();
    for (key, value) in fields {
        match key.as_str() {
            "destination" => manifest.destination = Some(value),
            "primary_key" => manifest.primary_key = Some(value),
            "columns" => manifest.columns = Some(value),
            "incremental" => {
                let incremental = value
                    .as_bool()
                    .ok_or_else(|| anyhow::anyhow!("incremental must be a boolean"))?;
                manifest.incremental = Some(incremental);
            }
            "metadata" => manifest.metadata = Some(value),
            "column_metadata" => manifest.column_metadata = Some(value),
            "delete_where" => manifest.delete_where = Some(value),
            other => anyhow::bail!("unknown table manifest key '{other}'"),
        }
    }
    Ok(manifest)
}
