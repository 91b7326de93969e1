//! Field comparators for record linkage.
//!
//! A [`Comparator`] scores two field values in `[0, 1]` and explains the
//! score through a details map. Comparators are looked up by name in a
//! [`ComparatorRegistry`]; [`default_registry`] holds the built-ins.

pub mod builtin;
pub mod comparator;
pub mod dates;
pub mod normalize;
pub mod registry;
pub mod sequence;

pub use builtin::register_builtins;
pub use comparator::{
    Comparator, Comparison, ComparisonContext, details, param_bool, param_f64, param_str,
    param_usize,
};
pub use dates::parse_date;
pub use normalize::{normalize_text, tokens};
pub use registry::{ComparatorRegistry, default_registry};
pub use sequence::{gestalt_ratio, similarity_ratio};
