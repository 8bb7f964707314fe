// ============================================================================
// reframe-cli/src/main.rs
// ============================================================================
//
// REFRAME CLI: Main Entry Point
//
// Parses arguments, sets up logging and dispatches to the subcommands.
//
// Exit codes:
// - 0: every file was normalized (or the probe succeeded)
// - 1: the run could not start or was aborted (bad input, missing tools, ...)
// - 2: the batch ran but at least one file failed

use clap::Parser;
use console::style;
use log::{debug, error, info};
use reframe_cli::logging::init_logging;
use reframe_cli::{Cli, Commands, run_normalize, run_probe};
use std::process;

const EXIT_ERROR: i32 = 1;
const EXIT_FILES_FAILED: i32 = 2;

fn main() {
    let cli = Cli::parse();

    match init_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(log_file)) => {
            eprintln!("Logging to {}", log_file.display());
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(EXIT_ERROR);
        }
    }
    info!("reframe {} starting", env!("CARGO_PKG_VERSION"));

    let exit_code = match cli.command {
        Commands::Normalize(args) => match run_normalize(args) {
            Ok(report) if report.has_failures() => {
                error!(
                    "{} of {} file(s) failed",
                    report.summary.failed, report.summary.total
                );
                EXIT_FILES_FAILED
            }
            Ok(_) => 0,
            Err(e) => {
                debug!("Command failed: {:?}", e);
                eprintln!("{} {}", style("Error:").red().bold(), e);
                EXIT_ERROR
            }
        },
        Commands::Probe(args) => match run_probe(args) {
            Ok(()) => 0,
            Err(e) => {
                debug!("Command failed: {:?}", e);
                eprintln!("{} {}", style("Error:").red().bold(), e);
                EXIT_ERROR
            }
        },
    };

    process::exit(exit_code);
}
