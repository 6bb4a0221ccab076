//! Property-based tests for the pipeline builder and reshaping.

use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The same pattern always yields an identical stage sequence.
    #[test]
    fn prop_builder_is_deterministic(pattern in ".{0,40}") {
        prop_assert_eq!(build_config_pipeline(&pattern), build_config_pipeline(&pattern));
    }

    /// The pattern only ever reaches the board filter, verbatim.
    #[test]
    fn prop_pattern_only_in_filter(pattern in "[a-z^$.-]{1,20}", other in "[A-Z]{1,5}") {
        let a = build_config_pipeline(&pattern);
        let b = build_config_pipeline(&other);

        prop_assert_eq!(&a.stages()[1..], &b.stages()[1..]);
        let Stage::Filter(predicates) = &a.stages()[0] else {
            return Err(TestCaseError::fail("first stage must filter"));
        };
        let is_slug_regex = matches!(
            &predicates[0],
            Predicate::Regex { pattern: p, case_insensitive: true, .. } if *p == pattern
        );
        prop_assert!(is_slug_regex, "first predicate must be the slug regex");
    }

    /// Converting pairs keeps one entry per distinct key holding its last value.
    #[test]
    fn prop_pairs_to_map_last_wins(pairs in proptest::collection::vec(("[a-d]", 0u32..100), 0..30)) {
        let map = pairs_to_map(pairs.iter().cloned().map(|(k, v)| Pair::new(k, v)));

        let mut expected = BTreeMap::new();
        for (k, v) in &pairs {
            expected.insert(k.clone(), *v);
        }
        prop_assert_eq!(map, expected);
    }

    /// Spreading a mapping and collecting it again loses nothing.
    #[test]
    fn prop_map_to_pairs_inverts(map in proptest::collection::btree_map("[a-z]{1,4}", 0u32..100, 0..20)) {
        let pairs = map_to_pairs(map.clone());

        prop_assert_eq!(pairs.len(), map.len());
        prop_assert_eq!(pairs_to_map(pairs), map);
    }
}
