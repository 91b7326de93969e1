//! Tests for linkage-model types.

use linkage_model::{
    Cardinality, EngineResult, FieldComparatorConfig, FieldScore, IndexSide, PairScore, Rule,
    RuleSet,
};

#[test]
fn rule_set_order_is_fixed_at_construction() {
    let rules = vec![
        Rule::new("name", vec![FieldComparatorConfig::new("n", "n", "ratio")]).with_priority(50),
        Rule::new("email", vec![FieldComparatorConfig::new("e", "e", "icase_exact")])
            .with_priority(10),
        Rule::new("address", vec![FieldComparatorConfig::new("a", "a", "jaccard")])
            .with_priority(50),
    ];
    let set = RuleSet::new(rules).expect("valid rules");
    let order: Vec<(i64, &str)> = set
        .rules()
        .iter()
        .map(|rule| (rule.priority, rule.name.as_str()))
        .collect();
    assert_eq!(order, vec![(10, "email"), (50, "address"), (50, "name")]);
}

#[test]
fn duplicate_names_keep_insertion_order() {
    let first = Rule::new("dup", vec![FieldComparatorConfig::new("a", "a", "exact")])
        .with_description("first");
    let second = Rule::new("dup", vec![FieldComparatorConfig::new("b", "b", "exact")])
        .with_description("second");
    let set = RuleSet::new(vec![first, second]).expect("valid rules");
    assert_eq!(set.rules()[0].description.as_deref(), Some("first"));
    assert_eq!(set.rules()[1].description.as_deref(), Some("second"));
}

#[test]
fn engine_result_serializes_full_explanation() {
    let mut details = serde_json::Map::new();
    details.insert("match".to_string(), serde_json::Value::Bool(true));
    let mut result = EngineResult::new(Cardinality::OneToMany);
    result.matches_index.insert(
        "L1".to_string(),
        vec![PairScore {
            left_id: "L1".to_string(),
            right_id: "R10".to_string(),
            rule_name: "email".to_string(),
            total_score: 1.0,
            matched: true,
            field_scores: vec![FieldScore {
                left_field: "email".to_string(),
                right_field: "email".to_string(),
                comparator: "icase_exact".to_string(),
                weight: 1.0,
                score: 1.0,
                passed: true,
                details,
            }],
            weight_sum: 1.0,
        }],
    );
    result.unmatched_right_ids.push("R11".to_string());

    let json = serde_json::to_value(&result).expect("serialize result");
    assert_eq!(json["indexed_by"], "left");
    assert_eq!(json["matches_index"]["L1"][0]["right_id"], "R10");
    assert_eq!(
        json["matches_index"]["L1"][0]["field_scores"][0]["details"]["match"],
        true
    );
    assert_eq!(json["unmatched_right_ids"][0], "R11");

    let round: EngineResult = serde_json::from_value(json).expect("deserialize result");
    assert_eq!(round, result);
    assert_eq!(round.unmatched_on(IndexSide::Right), ["R11".to_string()]);
}
