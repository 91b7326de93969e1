use std::num::NonZeroUsize;

use linkage_model::Cardinality;

/// Per-run settings for [`MatchingEngine::match_records`].
///
/// [`MatchingEngine::match_records`]: crate::MatchingEngine::match_records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    pub cardinality: Cardinality,
    pub left_id_field: String,
    pub right_id_field: String,
    /// Maximum matches kept per index record.
    pub top_k: Option<NonZeroUsize>,
    /// Score index records on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            cardinality: Cardinality::OneToMany,
            left_id_field: "id".to_string(),
            right_id_field: "id".to_string(),
            top_k: None,
            parallel: false,
        }
    }
}

impl MatchOptions {
    pub fn new(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            ..Self::default()
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_left_id_field(mut self, field: impl Into<String>) -> Self {
        self.left_id_field = field.into();
        self
    }

    pub fn with_right_id_field(mut self, field: impl Into<String>) -> Self {
        self.right_id_field = field.into();
        self
    }

    pub fn with_top_k(mut self, top_k: Option<NonZeroUsize>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
