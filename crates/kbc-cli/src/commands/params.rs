//! `kbc params` command.

use std::path::Path;

use clap::Args;
use kbc_config::Config;

/// Print the component parameters.
#[derive(Debug, Args)]
pub struct ParamsArgs {
    /// Print a single line instead of pretty JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Executes the params command.
pub fn execute(data_dir: Option<&Path>, args: &ParamsArgs) -> anyhow::Result<()> {
    let config = Config::new(data_dir)?;
    println!("{}", render(&config, args.compact)?);
    Ok(())
}

fn render(config: &Config, compact: bool) -> anyhow::Result<String> {
    let params = config.parameters();
    Ok(if compact {
        serde_json::to_string(params)?
    } else {
        serde_json::to_string_pretty(params)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_render() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"parameters":{"b":2,"a":{"x":true}}}"#,
        )
        .expect("write");
        let config = Config::new(Some(dir.path())).expect("load");
        assert_eq!(
            render(&config, true).expect("render"),
            r#"{"b":2,"a":{"x":true}}"#
        );
    }

    #[test]
    fn missing_parameters_render_empty_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), "{}").expect("write");
        let config = Config::new(Some(dir.path())).expect("load");
        assert_eq!(render(&config, false).expect("render"), "{}");
    }
}
