//! Config command
//!
//! Manage intelx configuration.

use anyhow::{Context, Result};
use clap::Subcommand;

use ix_core::config::Config;
use ix_storage::ConfigStore;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, store: &ConfigStore) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(store, json),
        ConfigCommand::Init { force } => init_config(store, force),
        ConfigCommand::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}

fn show_config(store: &ConfigStore, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = store.load()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if store.exists() {
        eprintln!("{}", store.path().display().to_string().dimmed());
    } else {
        eprintln!(
            "{} No configuration file; showing defaults. Run '{}' to create one.",
            "⚠".yellow(),
            "intelx config init".cyan()
        );
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(store: &ConfigStore, force: bool) -> Result<()> {
    use colored::Colorize;

    if store.exists() && !force {
        eprintln!(
            "{} Configuration already exists at {}. Use --force to overwrite.",
            "⚠".yellow(),
            store.path().display()
        );
        return Ok(());
    }

    store
        .save(&Config::default())
        .with_context(|| format!("Failed to write {}", store.path().display()))?;
    eprintln!("{} Created {}", "✓".green(), store.path().display());
    Ok(())
}
