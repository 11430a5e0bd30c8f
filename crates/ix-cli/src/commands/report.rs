//! Report command
//!
//! Build an aggregate `.intelreport` document or its JSON mirror.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use ix_core::batch::{BatchExporter, BatchOptions};
use ix_core::config::Config;
use super::{load_feeds, open_store, print_warnings};

/// Arguments for the report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// JSON file with an array of feed records (`-` for stdin)
    pub input: PathBuf,

    /// Maximum number of articles to embed
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Emit the JSON report instead of .intelreport
    #[arg(long)]
    pub json: bool,

    /// Output directory
    #[arg(long, short, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

/// Execute the report command
pub fn execute(args: ReportArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let feeds = load_feeds(&args.input)?;
    let exporter = BatchExporter::new(config);
    let options = BatchOptions { limit: args.limit };

    let (file_name, content, warnings) = if args.json {
        let export = exporter.export_report_json(&feeds, options)?;
        (export.file_name, export.json, export.warnings)
    } else {
        let export = exporter.export_report(&feeds, options)?;
        (export.file_name, export.serialized, export.warnings)
    };

    print_warnings(&warnings);

    if args.stdout {
        std::io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let store = open_store(args.output, config)?;
    let path = store
        .write(&file_name, content.as_bytes())
        .context("Failed to write report")?;
    eprintln!("{} Exported to {}", "✓".green(), path.display());

    Ok(())
}
