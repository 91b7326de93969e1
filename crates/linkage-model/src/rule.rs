//! Declarative matching rules.
//!
//! A [`RuleSet`] is validated once when it is built and its evaluation order
//! is fixed at that point: ascending priority, then ascending name.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{LinkageError, Result};

/// Comparator-specific parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Which side of a run provides the keys of the match index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Index by left record.
    #[default]
    OneToMany,
    /// Index by right record.
    ManyToOne,
}

impl Cardinality {
    pub fn index_side(self) -> IndexSide {
        match self {
            Self::OneToMany => IndexSide::Left,
            Self::ManyToOne => IndexSide::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToMany => "one_to_many",
            Self::ManyToOne => "many_to_one",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexSide {
    Left,
    Right,
}

impl IndexSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One field-to-field comparison inside a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldComparatorConfig {
    /// Field name on the left record.
    pub left_field: String,
    /// Field name on the right record.
    pub right_field: String,
    /// Registered comparator name.
    pub comparator: String,
    /// Weight in the rule's weighted mean.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub params: Option<Params>,
    /// When set, failing this binding disqualifies the whole rule.
    #[serde(default)]
    pub must: bool,
    /// Minimum score (0..=1) for the binding to count as passed.
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

impl FieldComparatorConfig {
    pub fn new(
        left_field: impl Into<String>,
        right_field: impl Into<String>,
        comparator: impl Into<String>,
    ) -> Self {
        Self {
            left_field: left_field.into(),
            right_field: right_field.into(),
            comparator: comparator.into(),
            weight: default_weight(),
            params: None,
            must: false,
            threshold: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_must(mut self, must: bool) -> Self {
        self.must = must;
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(key.into(), value.into());
        self
    }

    /// Threshold a score must reach for `passed`; zero when unset.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(0.0)
    }

    fn validate(&self, rule: &str) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(LinkageError::config(format!(
                "rule '{rule}': field '{}' -> '{}' has invalid weight {} (must be >= 0)",
                self.left_field, self.right_field, self.weight
            )));
        }
        if let Some(threshold) = self.threshold
            && !(0.0..=1.0).contains(&threshold)
        {
            return Err(LinkageError::config(format!(
                "rule '{rule}': field '{}' -> '{}' threshold {threshold} must be between 0 and 1",
                self.left_field, self.right_field
            )));
        }
        Ok(())
    }
}

/// A named matching strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Lower value is evaluated first.
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    // Parsed and kept for output; the engine always stops at the first
    // matching rule regardless of this flag.
    #[serde(default = "default_stop_on_first_rule_match")]
    pub stop_on_first_rule_match: bool,
    pub fields: Vec<FieldComparatorConfig>,
}

fn default_priority() -> i64 {
    100
}

fn default_match_threshold() -> f64 {
    0.8
}

fn default_stop_on_first_rule_match() -> bool {
    true
}

impl Rule {
    pub fn new(name: impl Into<String>, fields: Vec<FieldComparatorConfig>) -> Self {
        Self {
            name: name.into(),
            description: None,
            priority: default_priority(),
            cardinality: Cardinality::default(),
            match_threshold: default_match_threshold(),
            stop_on_first_rule_match: default_stop_on_first_rule_match(),
            fields,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sum of all binding weights.
    pub fn total_weight(&self) -> f64 {
        self.fields.iter().map(|field| field.weight).sum()
    }

    /// Checks the rule's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError::Configuration`] for an empty field list, a
    /// negative weight, a non-positive total weight or an out-of-range
    /// threshold.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(LinkageError::config(format!(
                "rule '{}': match_threshold {} must be between 0 and 1",
                self.name, self.match_threshold
            )));
        }
        if self.fields.is_empty() {
            return Err(LinkageError::config(format!(
                "rule '{}' must define at least one field comparator",
                self.name
            )));
        }
        for field in &self.fields {
            field.validate(&self.name)?;
        }
        if self.total_weight() <= 0.0 {
            return Err(LinkageError::config(format!(
                "rule '{}': sum of weights must be > 0",
                self.name
            )));
        }
        Ok(())
    }
}

/// Raw shape of a rules document before validation.
#[derive(Debug, Deserialize)]
struct RuleSetDocument {
    rules: Vec<Rule>,
}

/// A validated, non-empty, priority-ordered collection of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleSetDocument")]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validates the rules and fixes their evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError::Configuration`] if the list is empty or any
    /// rule fails [`Rule::validate`].
    pub fn new(mut rules: Vec<Rule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(LinkageError::config("RuleSet must contain at least one rule"));
        }
        for rule in &rules {
            rule.validate()?;
        }
        // Stable: duplicate (priority, name) pairs keep their input order.
        rules.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        Ok(Self { rules })
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The first rule in evaluation order.
    pub fn first(&self) -> &Rule {
        &self.rules[0]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct comparator names referenced by any rule, as written.
    pub fn comparator_names(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .flat_map(|rule| rule.fields.iter().map(|field| field.comparator.as_str()))
            .collect()
    }
}

impl TryFrom<RuleSetDocument> for RuleSet {
    type Error = LinkageError;

    fn try_from(document: RuleSetDocument) -> Result<Self> {
        Self::new(document.rules)
    }
}
