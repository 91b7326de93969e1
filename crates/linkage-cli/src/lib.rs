//! CLI library components for the `linkage` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
