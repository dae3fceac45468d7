//! `kbc inspect` command.
//!
//! Loads the data directory and prints what the component will see:
//! action, parameter keys, declared tables and downloaded files.

use std::path::Path;

use clap::Args;
use kbc_config::Config;
use serde_json::json;

use crate::output;

/// Summarize a data directory.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the inspect command.
pub fn execute(data_dir: Option<&Path>, args: &InspectArgs) -> anyhow::Result<()> {
    let config = Config::new(data_dir)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary(&config)?)?);
        return Ok(());
    }

    let input_tables = config.input_tables();
    let input_files = config.input_files()?;
    let output_tables = config.expected_output_tables();
    let output_files = config.expected_output_files();

    println!("Data directory: {}", config.data_dir().display());
    println!("  Action:        {}", display_action(config.action()));
    let keys: Vec<&str> = config.parameters().keys().map(String::as_str).collect();
    println!("  Parameters:    {} key(s) {}", keys.len(), keys.join(", "));

    println!("Input tables ({}):", input_tables.len());
    for table in &input_tables {
        println!("  {} -> {}", table.source(), table.full_path.display());
    }
    println!("Input files ({}):", input_files.len());
    for file in &input_files {
        println!("  {}", file.full_path.display());
    }
    println!("Output tables ({}):", output_tables.len());
    for table in &output_tables {
        println!("  {} -> {}", table.full_path.display(), table.destination());
    }
    println!("Output files ({}):", output_files.len());
    for file in &output_files {
        println!("  {} [{}]", file.full_path.display(), file.descriptor.tags.join(", "));
    }

    output::print_success("configuration is valid");
    Ok(())
}

fn display_action(action: &str) -> &str {
    if action.is_empty() {
        "run (default)"
    } else {
        action
    }
}

/// Builds the JSON form of the summary.
fn summary(config: &Config) -> anyhow::Result<serde_json::Value> {
    Ok(json!({
        "data_dir": config.data_dir(),
        "action": config.action(),
        "parameters": config.parameters(),
        "input_tables": config.input_tables(),
        "input_files": config.input_files()?,
        "output_tables": config.expected_output_tables(),
        "output_files": config.expected_output_files(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir_with(config: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), config).expect("write");
        dir
    }

    #[test]
    fn summary_lists_sections() {
        let dir = data_dir_with(
            r#"{"action":"test","parameters":{"a":1},
                "storage":{"output":{"tables":[{"source":"r.csv","destination":"out.c-main.r"}]}}}"#,
        );
        let config = Config::new(Some(dir.path())).expect("load");
        let value = summary(&config).expect("summary");
        assert_eq!(value["action"], "test");
        assert_eq!(value["parameters"]["a"], 1);
        assert_eq!(value["output_tables"][0]["destination"], "out.c-main.r");
        assert_eq!(value["input_files"], json!([]));
    }

    #[test]
    fn execute_fails_without_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = execute(Some(dir.path()), &InspectArgs { json: false }).unwrap_err();
        assert!(err.to_string().contains("config.json not found"));
    }

    #[test]
    fn empty_action_shown_as_default() {
        assert_eq!(display_action(""), "run (default)");
        assert_eq!(display_action("test"), "test");
    }
}
