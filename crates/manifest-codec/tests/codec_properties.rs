// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

// Encode-then-decode laws of the field codecs over generated values.
use std::collections::BTreeMap;

use manifest_codec::{
    from_json_str, from_yaml_str, to_json_string, to_yaml_string, NamedValue, PathBinding, PortPair,
    QuantityMap,
};
use proptest::prelude::*;

fn path() -> impl Strategy<Value = String> {
    "/[a-z0-9_./-]{0,24}"
}

proptest! {
    #[test]
    fn proptest_port_pair_round_trips(local in any::<i32>(), remote in any::<i32>()) {
        let pair = PortPair::new(local, remote);
        prop_assert_eq!(PortPair::decode(&pair.encode()), Ok(pair));

        let yaml = to_yaml_string(&pair).unwrap();
        prop_assert_eq!(from_yaml_str::<PortPair>(&yaml).unwrap(), pair);
    }

    #[test]
    fn proptest_bare_path_binding_encodes_to_the_path(path in path()) {
        let binding = PathBinding::new(path.clone()).unwrap();
        let json = to_json_string(&binding).unwrap();
        prop_assert_eq!(&json, &serde_json::to_string(&path).unwrap());
        prop_assert_eq!(from_json_str::<PathBinding>(&json).unwrap(), binding);
    }

    #[test]
    fn proptest_structured_path_binding_round_trips(
        path in path(),
        source in prop::option::of(path()),
        send_only in any::<bool>(),
        size in prop::option::of(0u32..1_000_000),
    ) {
        let mut binding = PathBinding::new(path).unwrap().with_send_only(send_only);
        if let Some(source) = source {
            binding = binding.with_source(source);
        }
        if let Some(size) = size {
            binding = binding.with_size(format!("{size}Mi").parse().unwrap());
        }

        let yaml = to_yaml_string(&binding).unwrap();
        prop_assert_eq!(from_yaml_str::<PathBinding>(&yaml).unwrap(), binding);
    }

    #[test]
    fn proptest_named_value_with_literal_value_round_trips(
        name in "[A-Z_][A-Z0-9_]{0,12}",
        value in "[a-z0-9/.:=-]{0,16}",
    ) {
        let entry = NamedValue::new(name.clone(), value.clone());
        let no_env = BTreeMap::<String, String>::new();
        prop_assert_eq!(NamedValue::decode_with(&entry.encode(), &no_env), entry);
    }

    #[test]
    fn proptest_quantity_map_is_all_or_nothing(
        good in prop::collection::btree_map("[a-z]{1,8}", 1u32..100_000, 0..6),
        bad_name in "[a-z]{1,8}",
    ) {
        let mut entries: BTreeMap<String, String> =
            good.iter().map(|(name, amount)| (name.clone(), format!("{amount}m"))).collect();
        prop_assert_eq!(QuantityMap::decode(entries.clone()).unwrap().len(), entries.len());

        entries.insert(bad_name, "not-a-quantity".to_string());
        prop_assert!(QuantityMap::decode(entries).is_err());
    }
}
