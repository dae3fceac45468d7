//! Shared fixtures for kbc-config integration tests.

use std::path::PathBuf;

/// Path of a data directory under the workspace `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}
