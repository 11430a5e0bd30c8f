//! Zip command
//!
//! Bundle feeds into a zip archive of `.intel` documents.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ix_core::batch::{BatchExporter, BatchOptions};
use ix_core::config::Config;
use super::{load_feeds, open_store, print_warnings};

/// Arguments for the zip command
#[derive(Debug, Args)]
pub struct ZipArgs {
    /// JSON file with an array of feed records (`-` for stdin)
    pub input: PathBuf,

    /// Maximum number of feeds to include
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the entry names written to the archive
    #[arg(long)]
    pub list: bool,
}

/// Execute the zip command
pub fn execute(args: ZipArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let feeds = load_feeds(&args.input)?;
    let exporter = BatchExporter::new(config);
    let export = exporter.export_zip(&feeds, BatchOptions { limit: args.limit })?;

    let store = open_store(args.output, config)?;
    let path = store
        .write_zip(&export)
        .context("Failed to write zip bundle")?;

    print_warnings(&export.warnings);
    if args.list {
        for name in &export.file_names {
            println!("{}", name);
        }
    }
    eprintln!(
        "{} Wrote {} document(s) to {}",
        "✓".green(),
        export.count.to_string().yellow(),
        path.display()
    );

    Ok(())
}
