//! # kbc-types
//!
//! Domain types for component data directories.
//! This crate contains pure data types and validation; it performs no
//! filesystem I/O (that lives in `kbc-config`).

pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod stored;

// Re-exports for convenience.
pub use descriptor::{
    FileQuery, InputFile, OutputFileDescriptor, ResolvedOutputFile, ResolvedTable,
    TableDescriptor,
};
pub use error::{DiagnosticError, ErrorKind, KbcError};
pub use manifest::{
    DeleteOperator, DeleteWhere, FileManifest, FileManifestArgs, MetadataEntry, TableManifest,
    TableManifestArgs,
};
pub use stored::{StoredFileManifest, StoredTableManifest};
