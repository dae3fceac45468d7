//! CLI command definitions.

pub mod file_manifest;
pub mod inspect;
pub mod params;
pub mod table_manifest;
