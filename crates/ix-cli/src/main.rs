//! intelx - intel document export CLI
//!
//! Turns JSON feed dumps into `.intel` documents, zip bundles and
//! aggregate reports, and fingerprints provenance bundles.
//!
//! ## Quick Start
//!
//! ```bash
//! # Bundle feeds into a zip of .intel documents
//! intelx zip feeds.json --limit 50
//!
//! # Build an aggregate report
//! intelx report feeds.json --json
//!
//! # Hash a provenance bundle
//! intelx hash bundle.json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
