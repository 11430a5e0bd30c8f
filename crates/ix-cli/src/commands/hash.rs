//! Hash command
//!
//! Compute the canonical hash of provenance bundles.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ix_core::provenance;

use super::{load_feeds, read_json};

/// Arguments for the hash command
#[derive(Debug, Args)]
pub struct HashArgs {
    /// JSON file with a provenance bundle, or feeds with `--feeds` (`-` for stdin)
    pub input: PathBuf,

    /// Print the canonical form instead of the hash
    #[arg(long)]
    pub canonical: bool,

    /// Treat the input as a feed list and hash each feed's provenance
    #[arg(long)]
    pub feeds: bool,

    /// Print the short fingerprint only
    #[arg(long, conflicts_with = "canonical")]
    pub short: bool,
}

/// Execute the hash command
pub fn execute(args: HashArgs) -> Result<()> {
    if args.feeds {
        let feeds = load_feeds(&args.input)?;
        for (index, feed) in feeds.iter().enumerate() {
            let label = feed.id.clone().unwrap_or_else(|| format!("#{}", index));
            match &feed.provenance {
                Some(bundle) => {
                    let out = render(bundle, &args)
                        .with_context(|| format!("Failed to hash provenance of {}", label))?;
                    println!("{}\t{}", label, out);
                }
                None => println!("{}\t-", label),
            }
        }
        return Ok(());
    }

    let bundle = read_json(&args.input)?;
    println!("{}", render(&bundle, &args)?);
    Ok(())
}

fn render(bundle: &serde_json::Value, args: &HashArgs) -> Result<String> {
    if args.canonical {
        return Ok(provenance::canonicalize_value(bundle)?);
    }

    let hash = provenance::hash_value(bundle)?;
    if args.short {
        Ok(provenance::short_fingerprint(&hash).to_string())
    } else {
        Ok(hash)
    }
}
