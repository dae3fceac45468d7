//! kbc CLI - inspect component data directories and write manifests.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod output;

/// kbc - Component data directory toolkit.
#[derive(Debug, Parser)]
#[command(name = "kbc", version, about)]
struct Cli {
    /// Data directory (defaults to $KBC_DATADIR).
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarize the configuration: action, parameters, tables and files.
    Inspect(commands::inspect::InspectArgs),
    /// Print the component parameters as JSON.
    Params(commands::params::ParamsArgs),
    /// Write a manifest for an output table.
    TableManifest(commands::table_manifest::TableManifestCmdArgs),
    /// Write a manifest for an output file.
    FileManifest(commands::file_manifest::FileManifestCmdArgs),
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing.
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    };

    tracing::debug!("kbc starting with data dir: {:?}", cli.data_dir);

    let data_dir = cli.data_dir.as_deref();
    let result = match &cli.command {
        Commands::Inspect(args) => commands::inspect::execute(data_dir, args),
        Commands::Params(args) => commands::params::execute(data_dir, args),
        Commands::TableManifest(args) => commands::table_manifest::execute(args),
        Commands::FileManifest(args) => commands::file_manifest::execute(args),
    };

    if let Err(e) = result {
        output::print_failure(&e);
        std::process::exit(1);
    }
}
