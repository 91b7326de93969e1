//! Fuzzy record linkage CLI.

use clap::Parser;
use linkage_cli::cli::Cli;
use linkage_cli::commands::{run_list_comparators, run_match, write_output};
use linkage_cli::logging::{init_logging, log_config_from_cli};
use linkage_cli::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = if cli.list_comparators {
        run_list_comparators();
        0
    } else {
        let outcome = run_match(&cli).and_then(|result| {
            write_output(&result, cli.format, &cli.output)?;
            if cli.summary {
                print_summary(&result);
            }
            Ok(())
        });
        match outcome {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        }
    };
    std::process::exit(exit_code);
}
