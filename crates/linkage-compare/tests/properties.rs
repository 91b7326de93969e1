// Property tests for the built-in comparators.

use linkage_compare::{default_registry, similarity_ratio};
use linkage_model::{FieldValue, Params};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Arbitrary field value: mostly text, sometimes numbers, dates or null.
fn arb_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        4 => r"[a-zA-Z0-9 .,@-]{0,24}".prop_map(FieldValue::Text),
        1 => (-1_000_000i64..1_000_000).prop_map(FieldValue::Int),
        1 => (-1.0e6..1.0e6f64).prop_map(FieldValue::Float),
        1 => r"20[0-9]{2}-0[1-9]-[0-2][1-8]".prop_map(FieldValue::Text),
        1 => any::<bool>().prop_map(FieldValue::Bool),
        1 => Just(FieldValue::Null),
    ]
}

fn evaluate(name: &str, left: &FieldValue, right: &FieldValue) -> f64 {
    default_registry()
        .evaluate(name, left, right, None, &Params::new())
        .map(|comparison| comparison.score)
        .unwrap_or(f64::NAN)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn builtin_scores_are_bounded(left in arb_value(), right in arb_value()) {
        for name in default_registry().names() {
            let score = evaluate(name, &left, &right);
            prop_assert!((0.0..=1.0).contains(&score), "{name} scored {score}");
        }
    }

    #[test]
    fn missing_input_scores_zero(value in arb_value()) {
        for name in default_registry().names() {
            prop_assert_eq!(evaluate(name, &FieldValue::Null, &value), 0.0, "{}", name);
            prop_assert_eq!(evaluate(name, &value, &FieldValue::Null), 0.0, "{}", name);
        }
    }

    #[test]
    fn exact_is_reflexive_for_non_null(value in arb_value()) {
        prop_assume!(!value.is_null());
        prop_assert_eq!(evaluate("exact", &value, &value), 1.0);
    }

    #[test]
    fn ratio_is_symmetric(a in r"[a-zA-Z ]{0,30}", b in r"[a-zA-Z ]{0,30}") {
        let forward = evaluate("ratio", &a.clone().into(), &b.clone().into());
        let backward = evaluate("ratio", &b.into(), &a.into());
        prop_assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn raw_ratio_is_symmetric_on_any_text(a in ".{0,40}", b in ".{0,40}") {
        prop_assert_eq!(similarity_ratio(&a, &b), similarity_ratio(&b, &a));
    }

    #[test]
    fn ratio_identity(a in r"[a-zA-Z0-9]{1,10}[a-zA-Z0-9 ]{0,20}") {
        prop_assert_eq!(evaluate("ratio", &a.clone().into(), &a.into()), 1.0);
    }

    #[test]
    fn jaccard_identity(a in r"[a-z0-9]{2,8}( [a-zA-Z0-9]{0,6}){0,3}") {
        prop_assert_eq!(evaluate("jaccard", &a.clone().into(), &a.into()), 1.0);
    }
}
