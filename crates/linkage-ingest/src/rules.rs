//! Rule-set documents in YAML, TOML or JSON.
//!
//! All three formats share one shape:
//!
//! ```yaml
//! rules:
//!   - name: email_exact
//!     priority: 10
//!     match_threshold: 0.9
//!     fields:
//!       - left_field: email
//!         right_field: email
//!         comparator: icase_exact
//! ```

use std::path::Path;

use linkage_model::{Rule, RuleSet};
use serde::Deserialize;

use crate::datasets::{INLINE, read_text};
use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Yaml,
    Toml,
    Json,
}

impl RuleFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    rules: Option<Vec<Rule>>,
}

/// Loads and validates a rule set.
///
/// # Errors
///
/// Fails on unreadable files, unknown extensions, malformed documents, a
/// missing `rules` key, or any rule failing validation.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let format = RuleFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
        expected: ".yaml, .yml, .toml or .json",
    })?;
    let text = read_text(path)?;
    let rules = parse_rule_set(&text, format, path)?;
    tracing::info!(
        path = %path.display(),
        rules = rules.len(),
        "loaded rule set"
    );
    Ok(rules)
}

pub fn parse_rule_set_yaml(text: &str) -> Result<RuleSet> {
    parse_rule_set(text, RuleFormat::Yaml, Path::new(INLINE))
}

pub fn parse_rule_set_toml(text: &str) -> Result<RuleSet> {
    parse_rule_set(text, RuleFormat::Toml, Path::new(INLINE))
}

pub fn parse_rule_set_json(text: &str) -> Result<RuleSet> {
    parse_rule_set(text, RuleFormat::Json, Path::new(INLINE))
}

fn parse_rule_set(text: &str, format: RuleFormat, path: &Path) -> Result<RuleSet> {
    let document: RulesDocument = match format {
        RuleFormat::Yaml => serde_yaml::from_str(text).map_err(|source| IngestError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
        RuleFormat::Toml => toml::from_str(text).map_err(|source| IngestError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        RuleFormat::Json => serde_json::from_str(text).map_err(|source| IngestError::Json {
            path: path.to_path_buf(),
            source,
        })?,
    };
    let rules = document
        .rules
        .ok_or_else(|| IngestError::shape(path, "rule set document must have a 'rules' key"))?;
    RuleSet::new(rules).map_err(|source| IngestError::Rules {
        path: path.to_path_buf(),
        source,
    })
}
