//! Property-based tests: rejected manifest arguments never reach the disk.

use kbc_config::{write_file_manifest, write_table_manifest, ConfigError};
use kbc_types::{ErrorKind, FileManifestArgs, TableManifestArgs};
use proptest::prelude::*;
use serde_json::{json, Value};

/// JSON that is never a list of strings.
fn not_a_string_list() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<i64>(), 1..4).prop_map(|v| json!(v)),
        prop::collection::btree_map("[a-z]{1,6}", "[a-z]{0,6}", 0..3)
            .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k, json!(v))).collect())),
    ]
}

fn assert_no_sidecar(dir: &tempfile::TempDir, name: &str) {
    assert!(!dir.path().join(format!("{name}.manifest")).exists());
}

proptest! {
    #[test]
    fn bad_primary_key_writes_nothing(primary_key in not_a_string_list()) {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = dir.path().join("t.csv");
        let err = write_table_manifest(&table, TableManifestArgs::new().primary_key(primary_key))
            .unwrap_err();
        prop_assert!(matches!(err, ConfigError::InvalidManifest(_)));
        prop_assert_eq!(err.kind(), ErrorKind::InvalidType);
        assert_no_sidecar(&dir, "t.csv");
    }

    #[test]
    fn bad_columns_beside_valid_fields_write_nothing(
        columns in not_a_string_list(),
        destination in "[a-z.]{1,20}",
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = dir.path().join("t.csv");
        let args = TableManifestArgs::new()
            .destination(destination)
            .incremental(true)
            .columns(columns);
        let err = write_table_manifest(&table, args).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidType);
        assert_no_sidecar(&dir, "t.csv");
    }

    #[test]
    fn bad_tags_write_nothing(tags in not_a_string_list()) {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f.bin");
        let err = write_file_manifest(&file, FileManifestArgs::new().tags(tags)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidType);
        assert_no_sidecar(&dir, "f.bin");
    }
}
