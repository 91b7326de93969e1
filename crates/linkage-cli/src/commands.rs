use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use linkage_compare::{ComparatorRegistry, default_registry};
use linkage_core::{MatchOptions, MatchingEngine};
use linkage_ingest::{load_dataset, load_rule_set};
use linkage_model::EngineResult;
use tracing::{info, info_span};

use crate::cli::{Cli, OutputFormatArg};
use crate::summary::{apply_table_style, header_cell};

/// Marker for writing the result to stdout.
pub const STDOUT_MARKER: &str = "-";

/// Loads the inputs named on the command line and runs the matcher.
///
/// Rules are loaded first so a bad rule file fails before any dataset is
/// read.
pub fn run_match(cli: &Cli) -> Result<EngineResult> {
    let (Some(left_path), Some(right_path), Some(rules_path)) = (&cli.left, &cli.right, &cli.rules)
    else {
        bail!("LEFT, RIGHT and RULES are required unless --list-comparators is given");
    };
    let span = info_span!("run", rules = %rules_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let rules = load_rule_set(rules_path)
        .with_context(|| format!("load rules: {}", rules_path.display()))?;
    let left = load_dataset(left_path)
        .with_context(|| format!("load left dataset: {}", left_path.display()))?;
    let right = load_dataset(right_path)
        .with_context(|| format!("load right dataset: {}", right_path.display()))?;

    let options = MatchOptions::new(cli.cardinality.into())
        .with_left_id_field(cli.left_id.as_str())
        .with_right_id_field(cli.right_id.as_str())
        .with_top_k(cli.top_k)
        .with_parallel(cli.parallel);
    let result = MatchingEngine::default()
        .match_records(&left, &right, &rules, &options)
        .context("match records")?;

    info!(
        duration_ms = start.elapsed().as_millis(),
        matched_pairs = result.matched_pair_count(),
        "run complete"
    );
    Ok(result)
}

/// Renders the result in the requested format.
pub fn render_output(result: &EngineResult, format: OutputFormatArg) -> Result<String> {
    match format {
        OutputFormatArg::Json => {
            let mut text = serde_json::to_string_pretty(result).context("serialize result")?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Writes the fully rendered result to a file or stdout.
///
/// Rendering finishes before the destination is touched, so a failure
/// never leaves partial output behind.
pub fn write_output(result: &EngineResult, format: OutputFormatArg, output: &Path) -> Result<()> {
    let text = render_output(result, format)?;
    if output.as_os_str() == STDOUT_MARKER {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .context("write result to stdout")?;
    } else {
        fs::write(output, text).with_context(|| format!("write result: {}", output.display()))?;
    }
    Ok(())
}

/// Table of comparator names and descriptions.
pub fn comparator_table(registry: &ComparatorRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Comparator"), header_cell("Description")]);
    apply_table_style(&mut table);
    for name in registry.names() {
        let description = registry.describe(name).unwrap_or_default();
        table.add_row(vec![name, description]);
    }
    table
}

pub fn run_list_comparators() {
    println!("{}", comparator_table(default_registry()));
}
