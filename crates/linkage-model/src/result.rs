//! Match results with full per-field explanations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::{Cardinality, IndexSide};

/// Free-form explanation produced by a comparator.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Outcome of one field binding on one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScore {
    pub left_field: String,
    pub right_field: String,
    pub comparator: String,
    pub weight: f64,
    pub score: f64,
    pub passed: bool,
    pub details: Details,
}

/// Outcome of one (left, right) pair under one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub left_id: String,
    pub right_id: String,
    pub rule_name: String,
    /// Weighted mean of the field scores.
    pub total_score: f64,
    pub matched: bool,
    pub field_scores: Vec<FieldScore>,
    pub weight_sum: f64,
}

impl PairScore {
    /// Identifier of the record on the given side.
    pub fn id_on(&self, side: IndexSide) -> &str {
        match side {
            IndexSide::Left => &self.left_id,
            IndexSide::Right => &self.right_id,
        }
    }
}

/// The complete result of one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub cardinality: Cardinality,
    pub indexed_by: IndexSide,
    /// Index-side identifier to its best matches, highest score first.
    pub matches_index: BTreeMap<String, Vec<PairScore>>,
    pub unmatched_left_ids: Vec<String>,
    pub unmatched_right_ids: Vec<String>,
}

impl EngineResult {
    pub fn new(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            indexed_by: cardinality.index_side(),
            matches_index: BTreeMap::new(),
            unmatched_left_ids: Vec::new(),
            unmatched_right_ids: Vec::new(),
        }
    }

    /// Number of pair scores stored across all index entries.
    pub fn matched_pair_count(&self) -> usize {
        self.matches_index.values().map(Vec::len).sum()
    }

    /// Unmatched identifiers on the given side.
    pub fn unmatched_on(&self, side: IndexSide) -> &[String] {
        match side {
            IndexSide::Left => &self.unmatched_left_ids,
            IndexSide::Right => &self.unmatched_right_ids,
        }
    }

    /// Number of stored pairs won by each rule.
    pub fn rule_hit_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for score in self.matches_index.values().flatten() {
            *counts.entry(score.rule_name.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
