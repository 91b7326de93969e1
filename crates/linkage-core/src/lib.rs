//! Matching engine: scores record pairs against a rule set and indexes the
//! matches by one side.

pub mod engine;
pub mod options;

pub use engine::MatchingEngine;
pub use options::MatchOptions;
