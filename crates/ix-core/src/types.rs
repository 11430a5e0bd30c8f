//! Core type definitions for intelx

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification used when a feed does not declare one
pub const DEFAULT_CLASSIFICATION: &str = "UNCLASS";

/// Priority of an exported record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest priority
    Low,
    /// Default priority
    #[default]
    Medium,
    /// Elevated priority
    High,
    /// Highest priority
    Critical,
}

impl Priority {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Severity of a validation warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Data was dropped or replaced
    Error,
    /// Data was kept but looks suspicious
    Warning,
}

/// A non-fatal problem found while mapping a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Field the warning refers to
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Severity
    pub severity: WarningSeverity,
}

impl ValidationWarning {
    /// Create a warning-severity entry
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: WarningSeverity::Warning,
        }
    }

    /// Create an error-severity entry
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: WarningSeverity::Error,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", level, self.field, self.message)
    }
}

/// Geographic location attached to a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Place name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    /// Whether both coordinates are on the globe
    pub fn in_bounds(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Confidence expressed either as a score or a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    /// Numeric score
    Score(serde_json::Number),
    /// Free-form label ("high", "B2", ...)
    Label(String),
}

/// The canonical exportable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelExportRecord {
    /// Stable identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Creation time, RFC 3339 with millisecond precision
    pub created: String,
    /// Last update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Classification marking
    pub classification: String,
    /// Priority
    pub priority: Priority,
    /// Deduplicated sources, first occurrence order
    pub sources: Vec<String>,
    /// Deduplicated tags, first occurrence order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Short summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Main content
    pub body: String,
    /// Confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl IntelExportRecord {
    /// Tags as a slice, empty when absent
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

/// Derive a stable record id from identifying feed content
pub fn derive_record_id(parts: &[&str]) -> String {
    let hash = blake3::hash(parts.join("\u{1f}").as_bytes());
    format!("intel-{}", &hash.to_hex()[..16])
}

/// Append values not already present, keeping first occurrence order.
///
/// Values are trimmed; blank values are skipped. Comparison is exact.
pub fn push_unique<'a, I>(target: &mut Vec<String>, values: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for value in values {
        let value = value.trim();
        if value.is_empty() || target.iter().any(|v| v == value) {
            continue;
        }
        target.push(value.to_string());
    }
}
