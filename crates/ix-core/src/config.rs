//! Configuration management for intelx

use crate::types::DEFAULT_CLASSIFICATION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record mapping and batch settings
    pub export: ExportConfig,
    /// Aggregate report settings
    pub report: ReportConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Maximum number of feeds per batch call
    pub default_limit: usize,
    /// Classification for feeds that declare none
    pub default_classification: String,
    /// Body size above which a warning is raised (bytes)
    pub max_body_bytes: usize,
    /// Tag count above which a warning is raised
    pub max_tags: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_limit: 200,
            default_classification: DEFAULT_CLASSIFICATION.to_string(),
            max_body_bytes: 200 * 1024,
            max_tags: 20,
        }
    }
}

/// Aggregate report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report title
    pub title: String,
    /// Maximum number of sources in the report frontmatter
    pub source_cap: usize,
    /// Maximum number of tags in the report frontmatter
    pub tag_cap: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Intel Report".to_string(),
            source_cap: 50,
            tag_cap: 100,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory artifacts are written to; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}
