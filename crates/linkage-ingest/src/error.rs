use std::path::PathBuf;

use linkage_model::LinkageError;
use thiserror::Error;

/// Errors raised while loading datasets or rule files.
///
/// Every variant carries the path of the offending input. In-memory
/// parsers report the pseudo path `<inline>`.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV in {}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid YAML in {}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid TOML in {}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported file format for {}: expected {expected}", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("unexpected content in {}: {message}", path.display())]
    InvalidShape { path: PathBuf, message: String },

    #[error("invalid rule set in {}", path.display())]
    Rules {
        path: PathBuf,
        source: LinkageError,
    },
}

impl IngestError {
    pub(crate) fn shape(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
