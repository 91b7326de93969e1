//! Built-in comparators.
//!
//! Every comparator tolerates null and malformed input by scoring `0.0`
//! with a `reason` in the details (`missing`, `not_numeric`, `not_date`,
//! `no_tokens`, `bad_direction`).

use linkage_model::{FieldValue, Params};
use rapidfuzz::distance::jaro_winkler;
use serde_json::Value;

use crate::comparator::{
    Comparator, Comparison, ComparisonContext, details, param_bool, param_f64, param_str,
    param_usize,
};
use crate::dates::parse_date;
use crate::normalize::{normalize_text, tokens};
use crate::registry::ComparatorRegistry;
use crate::sequence::similarity_ratio;

const DEFAULT_MIN_TOKEN_LEN: usize = 2;
const DEFAULT_MAX_DISTANCE: f64 = 1.0;
const DEFAULT_MAX_DAYS: i64 = 1;

/// Registers every built-in comparator under its fixed name.
pub fn register_builtins(registry: &mut ComparatorRegistry) {
    let builtins: [(&str, Box<dyn Comparator>); 8] = [
        ("exact", Box::new(Exact)),
        ("icase_exact", Box::new(IcaseExact)),
        ("ratio", Box::new(Ratio)),
        ("jaccard", Box::new(Jaccard)),
        ("contains", Box::new(Contains)),
        ("numeric_distance", Box::new(NumericDistance)),
        ("date_distance_days", Box::new(DateDistanceDays)),
        ("jaro_winkler", Box::new(JaroWinkler)),
    ];
    for (name, comparator) in builtins {
        registry.insert_boxed(name, comparator);
    }
}

/// Linear closeness: `1 - distance / max`, floored at zero.
///
/// A non-positive `max` means only identical values score.
fn scaled_closeness(distance: f64, max: f64) -> f64 {
    if max > 0.0 {
        (1.0 - distance / max).max(0.0)
    } else if distance == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Exact equality, case sensitive.
pub struct Exact;

impl Comparator for Exact {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        _params: &Params,
    ) -> Comparison {
        Comparison::boolean_match(!left.is_null() && left == right)
    }

    fn description(&self) -> &str {
        "Exact equality comparison (case sensitive)"
    }
}

/// Equality after trimming and lowercasing.
pub struct IcaseExact;

impl Comparator for IcaseExact {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        _params: &Params,
    ) -> Comparison {
        match (normalize_text(left, true), normalize_text(right, true)) {
            (Some(left), Some(right)) => Comparison::boolean_match(left == right),
            _ => Comparison::reason("missing"),
        }
    }

    fn description(&self) -> &str {
        "Exact equality ignoring case and surrounding spaces"
    }
}

/// Gestalt sequence similarity.
pub struct Ratio;

impl Comparator for Ratio {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        let case_insensitive = param_bool(params, "case_insensitive", true);
        let (Some(left), Some(right)) = (
            normalize_text(left, case_insensitive),
            normalize_text(right, case_insensitive),
        ) else {
            return Comparison::reason("missing");
        };
        let ratio = similarity_ratio(&left, &right);
        Comparison::new(ratio, details([("ratio", Value::from(ratio))]))
    }

    fn description(&self) -> &str {
        "Sequence matcher similarity ratio (0..1)"
    }
}

/// Jaccard similarity of alphanumeric token sets.
pub struct Jaccard;

impl Comparator for Jaccard {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        let case_insensitive = param_bool(params, "case_insensitive", true);
        let min_token_len = param_usize(params, "min_token_len", DEFAULT_MIN_TOKEN_LEN);
        let (Some(left), Some(right)) = (
            normalize_text(left, case_insensitive),
            normalize_text(right, case_insensitive),
        ) else {
            return Comparison::reason("missing");
        };
        let left_tokens = tokens(&left, min_token_len);
        let right_tokens = tokens(&right, min_token_len);
        if left_tokens.is_empty() && right_tokens.is_empty() {
            return Comparison::reason("no_tokens");
        }
        // BTreeSet iteration keeps the intersection sorted.
        let intersection: Vec<Value> = left_tokens
            .intersection(&right_tokens)
            .map(|token| Value::from(token.as_str()))
            .collect();
        let union_size = left_tokens.union(&right_tokens).count();
        let score = intersection.len() as f64 / union_size as f64;
        Comparison::new(
            score,
            details([
                ("intersection", Value::Array(intersection)),
                ("union_size", Value::from(union_size)),
            ]),
        )
    }

    fn description(&self) -> &str {
        "Jaccard similarity of token sets"
    }
}

/// Substring containment in a configured direction.
pub struct Contains;

impl Comparator for Contains {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        let case_insensitive = param_bool(params, "case_insensitive", true);
        let direction = param_str(params, "direction", "left_in_right");
        let (Some(left), Some(right)) = (
            normalize_text(left, case_insensitive),
            normalize_text(right, case_insensitive),
        ) else {
            return Comparison::reason("missing");
        };
        let found = match direction.as_str() {
            "left_in_right" => right.contains(&left),
            "right_in_left" => left.contains(&right),
            _ => {
                return Comparison::new(
                    0.0,
                    details([
                        ("reason", Value::from("bad_direction")),
                        ("direction", Value::from(direction)),
                    ]),
                );
            }
        };
        Comparison::new(
            if found { 1.0 } else { 0.0 },
            details([
                ("found", Value::Bool(found)),
                ("direction", Value::from(direction)),
            ]),
        )
    }

    fn description(&self) -> &str {
        "Substring containment with direction and case options"
    }
}

/// Absolute numeric difference scaled by `max_distance`.
pub struct NumericDistance;

impl Comparator for NumericDistance {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        let max_distance = param_f64(params, "max_distance", DEFAULT_MAX_DISTANCE);
        let (Some(left), Some(right)) = (left.as_f64(), right.as_f64()) else {
            return Comparison::reason("not_numeric");
        };
        let difference = (left - right).abs();
        let score = scaled_closeness(difference, max_distance);
        Comparison::new(
            score,
            details([
                ("difference", Value::from(difference)),
                ("max_distance", Value::from(max_distance)),
            ]),
        )
    }

    fn description(&self) -> &str {
        "Numeric distance scaled to 0..1 by max_distance"
    }
}

/// Day difference between two dates scaled by `max_days`.
pub struct DateDistanceDays;

impl Comparator for DateDistanceDays {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        // Whole days, like the distance itself.
        let max_days = param_f64(params, "max_days", DEFAULT_MAX_DAYS as f64).trunc() as i64;
        let (Some(left), Some(right)) = (parse_date(left), parse_date(right)) else {
            return Comparison::reason("not_date");
        };
        let days = (left - right).num_days().abs();
        let score = scaled_closeness(days as f64, max_days as f64);
        Comparison::new(
            score,
            details([
                ("days", Value::from(days)),
                ("max_days", Value::from(max_days)),
            ]),
        )
    }

    fn description(&self) -> &str {
        "Date distance in days scaled by max_days"
    }
}

/// Jaro-Winkler similarity on normalized text.
pub struct JaroWinkler;

impl Comparator for JaroWinkler {
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        let case_insensitive = param_bool(params, "case_insensitive", true);
        let (Some(left), Some(right)) = (
            normalize_text(left, case_insensitive),
            normalize_text(right, case_insensitive),
        ) else {
            return Comparison::reason("missing");
        };
        let similarity = jaro_winkler::similarity(left.chars(), right.chars());
        Comparison::new(similarity, details([("similarity", Value::from(similarity))]))
    }

    fn description(&self) -> &str {
        "Jaro-Winkler similarity of normalized text (0..1)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(comparator: &dyn Comparator, left: FieldValue, right: FieldValue) -> Comparison {
        comparator.compare(&left, &right, None, &Params::new())
    }

    fn compare_with(
        comparator: &dyn Comparator,
        left: FieldValue,
        right: FieldValue,
        params: &[(&str, Value)],
    ) -> Comparison {
        let params: Params = params
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect();
        comparator.compare(&left, &right, None, &params)
    }

    #[test]
    fn exact_requires_non_null_equality() {
        assert_eq!(compare(&Exact, "A".into(), "A".into()).score, 1.0);
        assert_eq!(compare(&Exact, "A".into(), "a".into()).score, 0.0);
        assert_eq!(compare(&Exact, FieldValue::Int(2), FieldValue::Float(2.0)).score, 1.0);
        assert_eq!(compare(&Exact, FieldValue::Bool(true), FieldValue::Int(1)).score, 1.0);
        let null = compare(&Exact, FieldValue::Null, FieldValue::Null);
        assert_eq!(null.score, 0.0);
        assert_eq!(null.details["match"], false);
    }

    #[test]
    fn icase_exact_normalizes() {
        let result = compare(&IcaseExact, " A@X.com".into(), "a@x.COM ".into());
        assert_eq!(result.score, 1.0);
        assert_eq!(result.details["match"], true);
        let missing = compare(&IcaseExact, FieldValue::Null, "a".into());
        assert_eq!(missing.score, 0.0);
        assert_eq!(missing.details["reason"], "missing");
    }

    #[test]
    fn ratio_respects_case_option() {
        assert_eq!(compare(&Ratio, "ACME".into(), "acme".into()).score, 1.0);
        let sensitive = compare_with(
            &Ratio,
            "ACME".into(),
            "acme".into(),
            &[("case_insensitive", Value::Bool(false))],
        );
        assert_eq!(sensitive.score, 0.0);
        assert_eq!(compare(&Ratio, FieldValue::Null, "x".into()).details["reason"], "missing");
    }

    #[test]
    fn jaccard_reports_intersection() {
        let result = compare(&Jaccard, "Acme Corp Ltd".into(), "acme-corp inc".into());
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.details["intersection"], serde_json::json!(["acme", "corp"]));
        assert_eq!(result.details["union_size"], 4);

        let short = compare(&Jaccard, "a b".into(), "c".into());
        assert_eq!(short.score, 0.0);
        assert_eq!(short.details["reason"], "no_tokens");

        let one_char = compare_with(
            &Jaccard,
            "a b".into(),
            "a c".into(),
            &[("min_token_len", Value::from(1))],
        );
        assert!((one_char.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn jaccard_with_zero_min_length_scores_empty_text() {
        let zero = [("min_token_len", Value::from(0))];
        let empty = compare_with(&Jaccard, "".into(), "".into(), &zero);
        assert_eq!(empty.score, 1.0);
        assert_eq!(empty.details["intersection"], serde_json::json!([""]));

        let default_len = compare(&Jaccard, "".into(), "".into());
        assert_eq!(default_len.details["reason"], "no_tokens");
    }

    #[test]
    fn contains_checks_direction() {
        let left_in_right = compare(&Contains, "corp".into(), "Acme Corp".into());
        assert_eq!(left_in_right.score, 1.0);
        assert_eq!(left_in_right.details["direction"], "left_in_right");

        let reversed = compare_with(
            &Contains,
            "corp".into(),
            "Acme Corp".into(),
            &[("direction", Value::from("right_in_left"))],
        );
        assert_eq!(reversed.score, 0.0);
        assert_eq!(reversed.details["found"], false);

        let bad = compare_with(
            &Contains,
            "corp".into(),
            "corp".into(),
            &[("direction", Value::from("sideways"))],
        );
        assert_eq!(bad.score, 0.0);
        assert_eq!(bad.details["reason"], "bad_direction");
        assert_eq!(bad.details["direction"], "sideways");
    }

    #[test]
    fn numeric_distance_scales() {
        let result = compare_with(
            &NumericDistance,
            "10".into(),
            FieldValue::Float(12.5),
            &[("max_distance", Value::from(5.0))],
        );
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.details["difference"], 2.5);

        assert_eq!(compare(&NumericDistance, 1.into(), 3.into()).score, 0.0);
        let bad = compare(&NumericDistance, "ten".into(), 10.into());
        assert_eq!(bad.details["reason"], "not_numeric");
    }

    #[test]
    fn non_positive_scale_means_exact() {
        let params = [("max_distance", Value::from(0))];
        assert_eq!(compare_with(&NumericDistance, 4.into(), 4.into(), &params).score, 1.0);
        assert_eq!(compare_with(&NumericDistance, 4.into(), 5.into(), &params).score, 0.0);
    }

    #[test]
    fn date_distance_in_days() {
        let result = compare_with(
            &DateDistanceDays,
            "2024-01-10".into(),
            "01/14/2024".into(),
            &[("max_days", Value::from(8))],
        );
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.details["days"], 4);
        assert_eq!(result.details["max_days"], 8);

        let same_day = compare(&DateDistanceDays, "2024-01-10".into(), "2024-01-10T08:00:00".into());
        assert_eq!(same_day.score, 1.0);

        let bad = compare(&DateDistanceDays, "soon".into(), "2024-01-10".into());
        assert_eq!(bad.details["reason"], "not_date");
    }

    #[test]
    fn jaro_winkler_scores_prefixes_high() {
        let result = compare(&JaroWinkler, "MARTHA".into(), "marhta".into());
        assert!(result.score > 0.9);
        assert_eq!(compare(&JaroWinkler, "abc".into(), "abc".into()).score, 1.0);
        assert_eq!(compare(&JaroWinkler, FieldValue::Null, "x".into()).details["reason"], "missing");
    }
}
