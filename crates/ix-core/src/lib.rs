//! ix-core - Core library for intelx
//!
//! This crate provides the intel document export pipeline: mapping feed
//! records into validated export records, the deterministic `.intel`
//! document format, batch export into zip bundles and aggregate reports,
//! and content hashing of provenance bundles.

pub mod error;
pub mod types;
pub mod clock;
pub mod config;
pub mod feed;
pub mod mapper;
pub mod document;
pub mod batch;
pub mod provenance;

pub use error::{IxError, Result};
pub use types::*;
