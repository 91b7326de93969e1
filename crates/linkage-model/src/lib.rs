pub mod error;
pub mod record;
pub mod result;
pub mod rule;

pub use error::{LinkageError, Result};
pub use record::{FieldValue, MISSING_ID, Record};
pub use result::{Details, EngineResult, FieldScore, PairScore};
pub use rule::{Cardinality, FieldComparatorConfig, IndexSide, Params, Rule, RuleSet};
