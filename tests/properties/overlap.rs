//! Property tests for cross-workspace principal overlap.

use std::collections::BTreeSet;

use proptest::prelude::*;

use fabric_wall::domain::services::principal_overlap;

fn principal_ids() -> impl Strategy<Value = Vec<String>> {
    // A small alphabet makes collisions between the two sides likely.
    proptest::collection::vec("[a-dA-D]{1,3}", 0..12)
}

fn lowered(ids: &[String]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_ascii_lowercase()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: shared plus allowed is exactly the case-insensitive intersection.
    #[test]
    fn property_overlap_is_set_intersection(
        provider in principal_ids(),
        consumer in principal_ids(),
        allow in principal_ids(),
    ) {
        let overlap = principal_overlap(
            provider.iter().map(String::as_str),
            consumer.iter().map(String::as_str),
            allow.iter().map(String::as_str),
        );

        let expected: BTreeSet<String> = lowered(&provider)
            .intersection(&lowered(&consumer))
            .cloned()
            .collect();
        let reported: BTreeSet<String> = overlap.shared.union(&overlap.allowed).cloned().collect();
        prop_assert_eq!(reported, expected);
        prop_assert!(overlap.shared.is_disjoint(&overlap.allowed));
        prop_assert!(overlap.allowed.is_subset(&lowered(&allow)));
    }

    /// PROPERTY: overlap does not depend on which side is the provider.
    #[test]
    fn property_overlap_is_symmetric(provider in principal_ids(), consumer in principal_ids()) {
        let none: [&str; 0] = [];
        let forward = principal_overlap(
            provider.iter().map(String::as_str),
            consumer.iter().map(String::as_str),
            none,
        );
        let backward = principal_overlap(
            consumer.iter().map(String::as_str),
            provider.iter().map(String::as_str),
            none,
        );
        prop_assert_eq!(forward, backward);
    }

    /// PROPERTY: disjoint sides are always clean.
    #[test]
    fn property_disjoint_sides_are_clean(ids in proptest::collection::btree_set("[a-z]{4}", 0..10)) {
        let ids: Vec<String> = ids.into_iter().collect();
        let provider: Vec<&str> = ids.iter().step_by(2).map(String::as_str).collect();
        let consumer: Vec<&str> = ids.iter().skip(1).step_by(2).map(String::as_str).collect();
        let none: [&str; 0] = [];

        let overlap = principal_overlap(provider, consumer, none);
        prop_assert!(overlap.is_clean());
    }
}
