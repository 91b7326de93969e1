//! The comparator capability.
//!
//! A comparator is a pure function of two field values plus optional
//! context and parameters. It never fails: bad input scores `0.0` and
//! explains itself through a `reason` entry in the details.

use linkage_model::{Details, FieldValue, Params, Record, Rule};
use serde_json::Value;

/// Read-only view of the pair and rule being evaluated.
///
/// Lets comparators apply cross-field logic.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonContext<'a> {
    pub left: &'a Record,
    pub right: &'a Record,
    pub rule: &'a Rule,
}

/// Score plus explanation returned by a comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub score: f64,
    pub details: Details,
}

impl Comparison {
    pub fn new(score: f64, details: Details) -> Self {
        Self { score, details }
    }

    /// A zero score with a machine-readable reason.
    pub fn reason(reason: &str) -> Self {
        Self::new(0.0, details([("reason", Value::from(reason))]))
    }

    /// A 1.0/0.0 score carrying `{"match": <bool>}`.
    pub fn boolean_match(matched: bool) -> Self {
        Self::new(
            if matched { 1.0 } else { 0.0 },
            details([("match", Value::Bool(matched))]),
        )
    }
}

/// Builds a details map from key/value pairs.
pub fn details<const N: usize>(entries: [(&str, Value); N]) -> Details {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Trait for similarity functions.
///
/// Implementors must be thread-safe: a registry is shared read-only across
/// concurrent evaluations once populated.
///
/// # Example
///
/// ```ignore
/// struct Prefix;
///
/// impl Comparator for Prefix {
///     fn compare(
///         &self,
///         left: &FieldValue,
///         right: &FieldValue,
///         _context: Option<&ComparisonContext<'_>>,
///         _params: &Params,
///     ) -> Comparison {
///         // ...
///     }
/// }
/// ```
pub trait Comparator: Send + Sync {
    /// Scores two values.
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison;

    /// Returns a human-readable description of the comparator.
    fn description(&self) -> &str {
        "Custom comparator"
    }
}

/// Plain functions and closures with the comparator signature are comparators.
impl<F> Comparator for F
where
    F: Fn(&FieldValue, &FieldValue, Option<&ComparisonContext<'_>>, &Params) -> Comparison
        + Send
        + Sync,
{
    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Comparison {
        self(left, right, context, params)
    }
}

/// Boolean parameter, falling back to `default` when absent or mistyped.
pub fn param_bool(params: &Params, key: &str, default: bool) -> bool {
    match params.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => default,
        },
        _ => default,
    }
}

/// Numeric parameter, accepting numbers and numeric strings.
pub fn param_f64(params: &Params, key: &str, default: f64) -> f64 {
    match params.get(key) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(default),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Non-negative integer parameter.
pub fn param_usize(params: &Params, key: &str, default: usize) -> usize {
    match params.get(key) {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
            .map_or(default, |n| n as usize),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// String parameter; non-string scalars are rendered as text.
pub fn param_str(params: &Params, key: &str, default: &str) -> String {
    match params.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_half(
        _: &FieldValue,
        _: &FieldValue,
        _: Option<&ComparisonContext<'_>>,
        _: &Params,
    ) -> Comparison {
        Comparison::new(0.5, Details::new())
    }

    #[test]
    fn functions_are_comparators() {
        let result = always_half.compare(
            &FieldValue::Null,
            &FieldValue::Null,
            None,
            &Params::new(),
        );
        assert_eq!(result.score, 0.5);
        assert_eq!(always_half.description(), "Custom comparator");
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let mut params = Params::new();
        params.insert("flag".into(), Value::from("no"));
        params.insert("distance".into(), Value::from("2.5"));
        params.insert("len".into(), Value::from(3));
        params.insert("bad".into(), Value::from("abc"));
        assert!(!param_bool(&params, "flag", true));
        assert!(param_bool(&params, "missing", true));
        assert_eq!(param_f64(&params, "distance", 1.0), 2.5);
        assert_eq!(param_f64(&params, "bad", 1.0), 1.0);
        assert_eq!(param_usize(&params, "len", 2), 3);
        assert_eq!(param_usize(&params, "bad", 2), 2);
        assert_eq!(param_str(&params, "direction", "left_in_right"), "left_in_right");
    }

    #[test]
    fn reason_scores_zero() {
        let result = Comparison::reason("missing");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["reason"], "missing");
    }
}
