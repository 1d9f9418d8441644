//! # Extract Command
//!
//! Opens the source (folder or `.mbz`), runs the extraction engine and
//! prints the one-line summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mfe_backup::extract;
use mfe_store::open_source;

/// Positional arguments of `mfe`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to a .mbz file or to the folder it was extracted into.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Path to the destination folder.
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,
}

/// Execute the extraction and print the summary.
///
/// Returns the process exit code. Run-level failures (unusable source,
/// missing `files.xml`, unreadable activities folder) are returned as errors.
pub fn run_extract(args: &ExtractArgs) -> Result<u8> {
    let store = open_source(&args.source).context("error getting source")?;

    let report = extract(store.as_ref(), &args.destination).with_context(|| {
        format!("failed to extract {}", args.source.display())
    })?;

    println!("{}", summary(report.copied(), &args.destination));
    Ok(0)
}

fn summary(copied: usize, destination: &std::path::Path) -> String {
    match copied {
        0 => "No files copied.".to_string(),
        1 => format!("Copied 1 file to {}", destination.display()),
        n => format!("Copied {n} files to {}", destination.display()),
    }
}
