//! # kbc-config
//!
//! Reads the configuration of a containerized component from its data
//! directory and writes manifests for the artifacts it produces.
//! The data directory comes from an explicit path or `KBC_DATADIR`.

pub mod config;
pub mod dialect;
pub mod error;
pub mod loader;
pub mod manifest_loader;
pub mod manifest_writer;
pub mod schema;
pub mod state;

pub use config::Config;
pub use dialect::{get_dialect, list_dialects, register_csv_dialect, CsvDialect, KBC_DIALECT};
pub use error::ConfigError;
pub use loader::{load_document, resolve_data_dir, DATA_DIR_ENV};
pub use manifest_writer::{write_file_manifest, write_table_manifest};
pub use schema::ConfigDocument;
