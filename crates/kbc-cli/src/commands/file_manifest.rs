//! `kbc file-manifest` command.

use std::path::PathBuf;

use clap::Args;
use kbc_types::FileManifestArgs;

use crate::output;

/// Write a manifest for an output file.
#[derive(Debug, Args)]
pub struct FileManifestCmdArgs {
    /// Path of the output file (the manifest is written next to it).
    pub path: PathBuf,

    /// Tag to assign to the uploaded file (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Make the file publicly accessible.
    #[arg(long)]
    pub public: bool,

    /// Expire the file instead of keeping it permanently.
    #[arg(long)]
    pub no_permanent: bool,

    /// Notify project members about the upload.
    #[arg(long)]
    pub notify: bool,
}

impl FileManifestCmdArgs {
    fn manifest_args(&self) -> FileManifestArgs {
        FileManifestArgs::new()
            .tags(self.tags.clone())
            .is_public(self.public)
            .is_permanent(!self.no_permanent)
            .notify(self.notify)
    }
}

/// Executes the file-manifest command.
pub fn execute(args: &FileManifestCmdArgs) -> anyhow::Result<()> {
    let written = kbc_config::write_file_manifest(&args.path, args.manifest_args())?;
    output::print_success(&format!("manifest written to {}", written.display()));
    Ok(())
}
