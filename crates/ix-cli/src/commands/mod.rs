//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod hash;
pub mod map;
pub mod report;
pub mod zip;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ix_core::batch::BatchWarning;
use ix_core::config::Config;
use ix_core::feed::FeedRecord;
use ix_storage::{ArtifactStore, ConfigStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// intelx - intel document export pipeline
#[derive(Debug, Parser)]
#[command(name = "intelx")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "INTELX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bundle feeds into a zip of .intel documents
    Zip(zip::ZipArgs),

    /// Build an aggregate .intelreport or JSON report
    Report(report::ReportArgs),

    /// Print the .intel document for a single feed
    Map(map::MapArgs),

    /// Hash provenance bundles
    Hash(hash::HashArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::discover(),
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Zip(args) => zip::execute(args, &store.load()?),
        Commands::Report(args) => report::execute(args, &store.load()?),
        Commands::Map(args) => map::execute(args, &store.load()?),
        Commands::Hash(args) => hash::execute(args),
        Commands::Config(cmd) => config::execute(cmd, &store),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a JSON document from a file, or stdin when the path is `-`
pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Load feeds from a JSON array (a single object is treated as one feed)
pub(crate) fn load_feeds(path: &Path) -> Result<Vec<FeedRecord>> {
    let value = read_json(path)?;
    let feeds: Vec<FeedRecord> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|feed| vec![feed])
    }
    .with_context(|| format!("{} is not a feed list", path.display()))?;
    debug!("Loaded {} feed(s) from {}", feeds.len(), path.display());
    Ok(feeds)
}

/// Resolve the output directory: flag, then config, then the platform default
pub(crate) fn output_dir(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.output.directory.clone())
        .unwrap_or_else(ArtifactStore::default_dir)
}

/// Open the artifact store for the resolved output directory
pub(crate) fn open_store(flag: Option<PathBuf>, config: &Config) -> Result<ArtifactStore> {
    let dir = output_dir(flag, config);
    debug!("Writing artifacts to {}", dir.display());
    ArtifactStore::new(&dir).with_context(|| format!("Failed to open {}", dir.display()))
}

/// Print batch warnings to stderr
pub(crate) fn print_warnings(warnings: &[BatchWarning]) {
    use colored::Colorize;

    for warning in warnings {
        eprintln!("{} {}", "⚠".yellow(), warning);
    }
}
