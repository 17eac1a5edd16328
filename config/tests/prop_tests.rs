use proptest::prelude::*;

use chia_tools_config::{ConfigDocument, FieldPath, LeafPolicy, Value};

proptest! {
    /// A path with an empty segment anywhere is rejected.
    #[test]
    fn empty_segments_are_rejected(
        head in prop::collection::vec("[a-z_]{1,8}", 0..3),
        tail in prop::collection::vec("[a-z_]{1,8}", 0..3),
    ) {
        let mut parts = head.clone();
        parts.push(String::new());
        parts.extend(tail);
        prop_assert!(FieldPath::parse(&parts.join(".")).is_err());
    }

    /// Setting a new leaf under an existing mapping never disturbs siblings.
    #[test]
    fn new_leaf_leaves_siblings_alone(key in "[a-z]{1,12}", port in 1u64..65536) {
        prop_assume!(key != "port");
        let mut doc = ConfigDocument::from_yaml_str("full_node:\n  port: 8444\n").unwrap();
        let path = FieldPath::parse(&format!("full_node.{key}")).unwrap();

        prop_assert!(doc.check(&path, &Value::from(port), LeafPolicy::MustExist).is_err());
        doc.set(&path, Value::from(port)).unwrap();

        prop_assert_eq!(doc.get(&path), Some(&Value::from(port)));
        prop_assert_eq!(doc.port_at("full_node.port"), Some(8444));
    }

    /// Nothing can be created below a missing parent.
    #[test]
    fn missing_parent_is_never_created(section in "[a-z]{1,12}") {
        prop_assume!(section != "full_node");
        let mut doc = ConfigDocument::from_yaml_str("full_node:\n  port: 8444\n").unwrap();
        let path = FieldPath::parse(&format!("{section}.port")).unwrap();
        prop_assert!(doc.set(&path, Value::from(1u64)).is_err());
        prop_assert!(doc.get_str_path(&section).is_none());
    }
}
