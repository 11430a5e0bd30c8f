//! Map command
//!
//! Print the `.intel` document for one feed record.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use ix_core::config::Config;
use ix_core::document::DocumentSerializer;
use ix_core::mapper::RecordMapper;

use super::load_feeds;

/// Arguments for the map command
#[derive(Debug, Args)]
pub struct MapArgs {
    /// JSON file with an array of feed records (`-` for stdin)
    pub input: PathBuf,

    /// Index of the feed to map
    #[arg(long, short, default_value_t = 0)]
    pub index: usize,
}

/// Execute the map command
pub fn execute(args: MapArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let feeds = load_feeds(&args.input)?;
    let Some(feed) = feeds.get(args.index) else {
        bail!(
            "Feed index {} out of range ({} feed(s) in {})",
            args.index,
            feeds.len(),
            args.input.display()
        );
    };

    let mapped = RecordMapper::new(config.export.clone()).map_and_validate(feed)?;
    for warning in &mapped.warnings {
        eprintln!("{} {}", "⚠".yellow(), warning);
    }

    print!("{}", DocumentSerializer::new().serialize(&mapped.record));
    Ok(())
}
