use thiserror::Error;

/// Structural errors surfaced by the linkage crates.
///
/// Data-level problems (missing fields, unparseable numbers or dates) are
/// never reported here; comparators absorb them into a zero score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkageError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("comparator name cannot be empty")]
    InvalidComparatorName,
    #[error("comparator '{name}' not found. Available: {}", available.join(", "))]
    ComparatorNotFound {
        name: String,
        available: Vec<String>,
    },
}

impl LinkageError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LinkageError>;
