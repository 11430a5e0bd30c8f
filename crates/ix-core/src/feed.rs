//! Input feed records as delivered by the acquisition layer

use crate::types::{Confidence, Location};
use serde::{Deserialize, Serialize};

/// Timestamp as it appears in a feed: text or Unix epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedTimestamp {
    /// Epoch milliseconds
    Epoch(serde_json::Number),
    /// Date string (RFC 3339, RFC 2822, ...)
    Text(String),
}

impl From<&str> for FeedTimestamp {
    fn from(s: &str) -> Self {
        FeedTimestamp::Text(s.to_string())
    }
}

/// A raw feed item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub timestamp: Option<FeedTimestamp>,
    /// Publication date, used when `timestamp` is absent
    pub pub_date: Option<FeedTimestamp>,
    pub updated: Option<FeedTimestamp>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub source_category: Option<String>,
    pub sources: Vec<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub priority: Option<String>,
    pub classification: Option<String>,
    pub location: Option<Location>,
    pub confidence: Option<Confidence>,
    /// Provenance bundle, kept untyped until it is canonicalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<serde_json::Value>,
}

impl FeedRecord {
    /// Start a feed with an id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the timestamp
    pub fn timestamp(mut self, ts: impl Into<FeedTimestamp>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// Add a source
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether the feed carries anything a record could be built from
    pub fn has_identity(&self) -> bool {
        [
            &self.id,
            &self.title,
            &self.content,
            &self.description,
            &self.summary,
            &self.link,
        ]
        .iter()
        .any(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
