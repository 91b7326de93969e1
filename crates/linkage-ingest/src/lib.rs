//! Loading of record datasets and rule-set files.
//!
//! Formats are chosen by file extension:
//!
//! - datasets: `.csv`, `.json`, `.ndjson` / `.jsonl`
//! - rule sets: `.yaml` / `.yml`, `.toml`, `.json`

pub mod datasets;
pub mod error;
pub mod rules;

pub use datasets::{DatasetFormat, load_dataset, parse_csv, parse_json, parse_ndjson};
pub use error::{IngestError, Result};
pub use rules::{
    RuleFormat, load_rule_set, parse_rule_set_json, parse_rule_set_toml, parse_rule_set_yaml,
};
