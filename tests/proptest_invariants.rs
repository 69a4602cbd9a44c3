
use proptest::prelude::*;
use serde_json::Value as Json;
use strategies::{arb_filter, arb_negation_pair, arb_policy, arb_record};
use warden::parse;

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// Parsing and evaluating the same filter against the same record must always
// produce the same answer, across repeated evaluation and re-parsing.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn determinism(filter in arb_filter(), record in arb_record()) {
        let tree = parse(&filter).unwrap();
        let first = tree.evaluate(&record).unwrap();
        for _ in 0..5 {
            prop_assert_eq!(first, tree.evaluate(&record).unwrap());
        }
        let reparsed = parse(&filter).unwrap();
        prop_assert_eq!(first, reparsed.evaluate(&record).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Inverted operators are exact negations of their base.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn inverted_operators_negate(pair in arb_negation_pair(), record in arb_record()) {
        let (base, negated) = pair;
        let base_result = parse(&base).unwrap().evaluate(&record).unwrap();
        let negated_result = parse(&negated).unwrap().evaluate(&record).unwrap();
        prop_assert_eq!(base_result, !negated_result);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Serialization round-trip preserves semantics.
//
// Re-expressing a tree in the caller-facing shape and parsing it back must
// evaluate identically on every record.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn round_trip_preserves_semantics(filter in arb_filter(), record in arb_record()) {
        let tree = parse(&filter).unwrap();
        let emitted = Json::Object(tree.to_filter());
        let reparsed = parse(&emitted).unwrap();
        prop_assert_eq!(
            tree.evaluate(&record).unwrap(),
            reparsed.evaluate(&record).unwrap(),
            "tree {} disagrees with reparse of {}",
            tree,
            emitted,
        );
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: The compiled filter agrees with the in-memory check.
//
// When accessible_by succeeds, evaluating its emitted filter must match
// Policy::can on every record; when it reports Forbidden, can is false.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn compiled_filter_agrees_with_can(gen in arb_policy(), record in arb_record()) {
        let policy = gen.build();
        let can = policy.can("read", "Article", &record).unwrap();
        match policy.accessible_by("read", "Article") {
            Ok(filter) => {
                let compiled = parse(&Json::Object(filter)).unwrap();
                prop_assert_eq!(compiled.evaluate(&record).unwrap(), can);
            }
            Err(_) => prop_assert!(!can, "forbidden pair must never match a record"),
        }
    }
}
