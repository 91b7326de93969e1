//! CLI argument definitions for the `linkage` binary.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use linkage_model::Cardinality;

#[derive(Parser)]
#[command(
    name = "linkage",
    version,
    about = "Rule-driven fuzzy record linkage between two datasets",
    long_about = "Match records from a LEFT and a RIGHT dataset using a rule file.\n\n\
                  Datasets may be CSV, JSON or NDJSON; rule files may be YAML, TOML or JSON.\n\
                  The result is written as JSON with per-field score explanations."
)]
pub struct Cli {
    /// Left dataset (.csv, .json, .ndjson or .jsonl).
    #[arg(value_name = "LEFT", required_unless_present = "list_comparators")]
    pub left: Option<PathBuf>,

    /// Right dataset (.csv, .json, .ndjson or .jsonl).
    #[arg(value_name = "RIGHT", required_unless_present = "list_comparators")]
    pub right: Option<PathBuf>,

    /// Rule file (.yaml, .yml, .toml or .json).
    #[arg(value_name = "RULES", required_unless_present = "list_comparators")]
    pub rules: Option<PathBuf>,

    /// Which side indexes the results.
    #[arg(long = "cardinality", value_enum, default_value = "one_to_many")]
    pub cardinality: CardinalityArg,

    /// Identifier field on left records.
    #[arg(long = "left-id", value_name = "FIELD", default_value = "id")]
    pub left_id: String,

    /// Identifier field on right records.
    #[arg(long = "right-id", value_name = "FIELD", default_value = "id")]
    pub right_id: String,

    /// Keep at most N matches per index record.
    #[arg(long = "top-k", value_name = "N")]
    pub top_k: Option<NonZeroUsize>,

    /// Output path, or `-` for stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// Score index records on all available cores.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Print a run summary table to stderr.
    #[arg(long = "summary")]
    pub summary: bool,

    /// List registered comparators and exit.
    #[arg(long = "list-comparators")]
    pub list_comparators: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Show the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Omit span close events from JSON logs.
    #[arg(long = "no-log-spans", global = true)]
    pub no_log_spans: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CardinalityArg {
    /// Index by left record.
    OneToMany,
    /// Index by right record.
    ManyToOne,
}

impl From<CardinalityArg> for Cardinality {
    fn from(arg: CardinalityArg) -> Self {
        match arg {
            CardinalityArg::OneToMany => Cardinality::OneToMany,
            CardinalityArg::ManyToOne => Cardinality::ManyToOne,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
