//! # mfe CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and runs
//! the extraction.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mfe_cli::extract::{run_extract, ExtractArgs};

/// Moodle File Extractor: extract all files from a .mbz Moodle backup.
///
/// Rebuilds the course's files under DESTINATION using their original
/// names, placing files of folder resources in a sub-folder named after the
/// resource. Existing files are never overwritten.
#[derive(Parser, Debug)]
#[command(name = "mfe", version, about, long_about = None)]
struct Cli {
    /// Enable debug output.
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print warnings, errors and the final summary.
    #[arg(short, long, conflicts_with_all = ["debug", "verbose"])]
    quiet: bool,

    #[command(flatten)]
    extract: ExtractArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = mfe_cli::log_level(cli.debug, cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mfe starting");

    match run_extract(&cli.extract) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
