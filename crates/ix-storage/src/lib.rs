//! ix-storage - Storage library for intelx
//!
//! This crate persists export artifacts and the configuration file.

mod artifact_store;
mod atomic;
mod config_store;

pub use artifact_store::ArtifactStore;
pub use config_store::{ConfigStore, PROJECT_CONFIG_PATH};
