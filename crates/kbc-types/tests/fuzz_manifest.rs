//! Property-based tests for the manifest validating constructors.
//!
//! Ensures validation never panics on arbitrary JSON and that well-formed
//! arguments are always accepted.

use kbc_types::{FileManifest, FileManifestArgs, TableManifest, TableManifestArgs};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "\\PC{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Arbitrary JSON in every slot never causes a panic.
    #[test]
    fn no_panic_on_arbitrary_arguments(
        destination in arb_json(),
        primary_key in arb_json(),
        metadata in arb_json(),
        column_metadata in arb_json(),
        delete_where in arb_json(),
        tags in arb_json(),
    ) {
        let args = TableManifestArgs::new()
            .destination(destination)
            .primary_key(primary_key)
            .metadata(metadata)
            .column_metadata(column_metadata)
            .delete_where(delete_where);
        let _ = TableManifest::try_from(args);
        let _ = FileManifest::try_from(FileManifestArgs::new().tags(tags));
    }

    /// Any list of strings is a valid primary key and survives serialization.
    #[test]
    fn string_lists_always_accepted(keys in prop::collection::vec("[a-z_]{1,12}", 0..8)) {
        let manifest = TableManifest::try_from(
            TableManifestArgs::new().primary_key(keys.clone()),
        );
        prop_assert!(manifest.is_ok(), "rejected: {manifest:?}");
        let value = serde_json::to_value(manifest.unwrap()).expect("serialize");
        prop_assert_eq!(value, json!({ "primary_key": keys }));
    }

    /// A scalar where a list is expected is always a type error.
    #[test]
    fn scalar_columns_rejected(column in "\\PC{0,16}") {
        let err = TableManifest::try_from(TableManifestArgs::new().columns(column))
            .unwrap_err();
        prop_assert!(err.is_type_error());
    }
}
