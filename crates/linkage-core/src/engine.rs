//! Cross-product matching.
//!
//! Every index-side record is scored against every record on the other
//! side. For each pair the rule set is tried in `(priority, name)` order and
//! the first matching rule wins; matched pairs are ranked, truncated to
//! `top_k` and stored under the index record's identifier.

use std::collections::{BTreeMap, HashSet};

use linkage_compare::{ComparatorRegistry, ComparisonContext, default_registry};
use linkage_model::{
    EngineResult, FieldScore, IndexSide, PairScore, Params, Record, Result, Rule, RuleSet,
};
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::options::MatchOptions;

/// Scores records against a rule set using comparators from a registry.
///
/// The engine holds no state between runs beyond the registry reference.
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine<'r> {
    registry: &'r ComparatorRegistry,
}

impl Default for MatchingEngine<'static> {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

/// Matched pairs found for one index-side record.
struct IndexOutcome {
    id: String,
    matches: Vec<PairScore>,
}

impl<'r> MatchingEngine<'r> {
    pub fn new(registry: &'r ComparatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ComparatorRegistry {
        self.registry
    }

    /// Scores one pair under one rule.
    ///
    /// Every binding is evaluated, even after a `must` binding has failed,
    /// so the returned pair carries a complete explanation.
    ///
    /// # Errors
    ///
    /// Fails if the rule names a comparator missing from the registry.
    pub fn score_pair(
        &self,
        left: &Record,
        right: &Record,
        rule: &Rule,
        left_id_field: &str,
        right_id_field: &str,
    ) -> Result<PairScore> {
        let context = ComparisonContext { left, right, rule };
        let no_params = Params::new();
        let total_weight = rule.total_weight();
        let mut weighted_sum = 0.0;
        let mut all_must_pass = true;
        let mut field_scores = Vec::with_capacity(rule.fields.len());

        for field in &rule.fields {
            let comparison = self.registry.evaluate(
                &field.comparator,
                left.value(&field.left_field),
                right.value(&field.right_field),
                Some(&context),
                field.params.as_ref().unwrap_or(&no_params),
            )?;
            let passed = comparison.score >= field.effective_threshold();
            if field.must && !passed {
                all_must_pass = false;
            }
            weighted_sum += comparison.score * field.weight;
            field_scores.push(FieldScore {
                left_field: field.left_field.clone(),
                right_field: field.right_field.clone(),
                comparator: field.comparator.clone(),
                weight: field.weight,
                score: comparison.score,
                passed,
                details: comparison.details,
            });
        }

        let total_score = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        Ok(PairScore {
            left_id: left.id(left_id_field),
            right_id: right.id(right_id_field),
            rule_name: rule.name.clone(),
            total_score,
            matched: all_must_pass && total_score >= rule.match_threshold,
            field_scores,
            weight_sum: total_weight,
        })
    }

    /// Picks the pair score for one pair across the whole rule set.
    ///
    /// Returns the first matching rule's score. When no rule matches, the
    /// highest-scoring rule is returned; the earliest rule wins ties.
    pub fn evaluate_rules_for_pair(
        &self,
        left: &Record,
        right: &Record,
        rules: &RuleSet,
        left_id_field: &str,
        right_id_field: &str,
    ) -> Result<PairScore> {
        let mut best: Option<PairScore> = None;
        for rule in rules.rules() {
            let score = self.score_pair(left, right, rule, left_id_field, right_id_field)?;
            if score.matched {
                return Ok(score);
            }
            if best
                .as_ref()
                .is_none_or(|current| score.total_score > current.total_score)
            {
                best = Some(score);
            }
        }
        match best {
            Some(score) => Ok(score),
            None => self.score_pair(left, right, rules.first(), left_id_field, right_id_field),
        }
    }

    /// Matches two record collections.
    ///
    /// Indexes by left records for `one_to_many` and by right records for
    /// `many_to_one`. Index records without any match land in the unmatched
    /// list of their side; records on the other side that never appear in a
    /// stored match land in the other unmatched list.
    ///
    /// # Errors
    ///
    /// Fails before scanning if any rule references a comparator that is
    /// not registered.
    pub fn match_records(
        &self,
        left: &[Record],
        right: &[Record],
        rules: &RuleSet,
        options: &MatchOptions,
    ) -> Result<EngineResult> {
        let span = info_span!(
            "match",
            cardinality = %options.cardinality,
            left_records = left.len(),
            right_records = right.len(),
            rules = rules.len(),
            parallel = options.parallel
        );
        let _guard = span.enter();

        for name in rules.comparator_names() {
            self.registry.get(name)?;
        }

        let mut result = EngineResult::new(options.cardinality);
        let index_side = result.indexed_by;
        let (index_records, other_records, other_id_field) = match index_side {
            IndexSide::Left => (left, right, options.right_id_field.as_str()),
            IndexSide::Right => (right, left, options.left_id_field.as_str()),
        };

        let scan = |record: &Record| self.scan_index_record(record, other_records, rules, options);
        let outcomes = if options.parallel {
            index_records
                .par_iter()
                .map(scan)
                .collect::<Result<Vec<_>>>()?
        } else {
            index_records.iter().map(scan).collect::<Result<Vec<_>>>()?
        };

        let mut unmatched_index = Vec::new();
        for outcome in outcomes {
            if outcome.matches.is_empty() {
                unmatched_index.push(outcome.id);
            } else {
                result
                    .matches_index
                    .entry(outcome.id)
                    .or_default()
                    .extend(outcome.matches);
            }
        }
        for matches in result.matches_index.values_mut() {
            rank_matches(matches, options);
        }
        // Duplicate identifiers: matched wins over unmatched.
        let unmatched_index = unique_in_order(unmatched_index)
            .into_iter()
            .filter(|id| !result.matches_index.contains_key(id))
            .collect();

        let other_side = match index_side {
            IndexSide::Left => IndexSide::Right,
            IndexSide::Right => IndexSide::Left,
        };
        let unmatched_other = unmatched_counterparts(
            &result.matches_index,
            other_side,
            other_records,
            other_id_field,
        );

        match index_side {
            IndexSide::Left => {
                result.unmatched_left_ids = unmatched_index;
                result.unmatched_right_ids = unmatched_other;
            }
            IndexSide::Right => {
                result.unmatched_right_ids = unmatched_index;
                result.unmatched_left_ids = unmatched_other;
            }
        }

        info!(
            indexed_by = index_side.as_str(),
            matched = result.matches_index.len(),
            pairs = result.matched_pair_count(),
            unmatched_left = result.unmatched_left_ids.len(),
            unmatched_right = result.unmatched_right_ids.len(),
            "matching complete"
        );
        Ok(result)
    }

    /// Scores one index record against every record on the other side and
    /// keeps the matched pairs.
    fn scan_index_record(
        &self,
        record: &Record,
        others: &[Record],
        rules: &RuleSet,
        options: &MatchOptions,
    ) -> Result<IndexOutcome> {
        let left_id_field = options.left_id_field.as_str();
        let right_id_field = options.right_id_field.as_str();
        let index_side = options.cardinality.index_side();
        let mut matches = Vec::new();
        for other in others {
            let (left, right) = match index_side {
                IndexSide::Left => (record, other),
                IndexSide::Right => (other, record),
            };
            let score =
                self.evaluate_rules_for_pair(left, right, rules, left_id_field, right_id_field)?;
            if score.matched {
                matches.push(score);
            }
        }
        let id = match index_side {
            IndexSide::Left => record.id(left_id_field),
            IndexSide::Right => record.id(right_id_field),
        };
        debug!(id = %id, candidates = others.len(), matches = matches.len(), "scored index record");
        Ok(IndexOutcome { id, matches })
    }
}

/// Highest score first, then rule name; truncated to `top_k`.
fn rank_matches(matches: &mut Vec<PairScore>, options: &MatchOptions) {
    matches.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.rule_name.cmp(&b.rule_name))
    });
    if let Some(top_k) = options.top_k {
        matches.truncate(top_k.get());
    }
}

fn unique_in_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Identifiers on `side` that never appear as the counterpart of a stored
/// match, in first-appearance order.
fn unmatched_counterparts(
    matches_index: &BTreeMap<String, Vec<PairScore>>,
    side: IndexSide,
    records: &[Record],
    id_field: &str,
) -> Vec<String> {
    let matched: HashSet<&str> = matches_index
        .values()
        .flatten()
        .map(|score| score.id_on(side))
        .collect();
    let ids = records.iter().map(|record| record.id(id_field)).collect();
    unique_in_order(ids)
        .into_iter()
        .filter(|id| !matched.contains(id.as_str()))
        .collect()
}
