//! Batch-level warnings

use crate::types::ValidationWarning;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a batch warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchWarningKind {
    /// No input feeds
    Empty,
    /// Duplicate id resolved with a suffix
    Collision,
    /// Report limit below input size
    Truncated,
    /// Record could not be mapped and was left out
    Skipped,
    /// Per-record validation warning
    Validation,
}

impl BatchWarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchWarningKind::Empty => "empty",
            BatchWarningKind::Collision => "collision",
            BatchWarningKind::Truncated => "truncated",
            BatchWarningKind::Skipped => "skipped",
            BatchWarningKind::Validation => "validation",
        }
    }
}

/// A non-fatal problem attached to a batch call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWarning {
    /// Warning kind
    #[serde(rename = "type")]
    pub kind: BatchWarningKind,
    /// Human-readable message
    pub message: String,
    /// Record the warning refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl BatchWarning {
    /// Create a warning not tied to a record
    pub fn new(kind: BatchWarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            record_id: None,
        }
    }

    /// Attach a record id
    pub fn for_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Lift a record validation warning into the batch
    pub fn from_validation(record_id: &str, warning: &ValidationWarning) -> Self {
        Self::new(BatchWarningKind::Validation, warning.to_string()).for_record(record_id)
    }
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record_id {
            Some(id) => write!(f, "{} ({}): {}", self.kind.as_str(), id, self.message),
            None => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}

/// Count warnings of one kind
pub fn count_kind(warnings: &[BatchWarning], kind: BatchWarningKind) -> usize {
    warnings.iter().filter(|w| w.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_kind_as_type() {
        let w = BatchWarning::new(BatchWarningKind::Collision, "dup").for_record("dup");
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"type":"collision","message":"dup","recordId":"dup"}"#);
    }

    #[test]
    fn test_from_validation() {
        let v = ValidationWarning::warning("body", "Body size 9 bytes exceeds 8 bytes");
        let w = BatchWarning::from_validation("a", &v);
        assert_eq!(w.kind, BatchWarningKind::Validation);
        assert!(w.message.contains("Body size"));
        assert_eq!(w.to_string(), "validation (a): [warning] body: Body size 9 bytes exceeds 8 bytes");
    }
}
