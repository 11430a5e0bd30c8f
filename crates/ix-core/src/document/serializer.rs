//! `.intel` document serializer

use super::frontmatter::{Frontmatter, FrontmatterValue};
use crate::types::{Confidence, IntelExportRecord};
use serde_json::{json, Value};

/// File extension of a single intel document
pub const INTEL_EXTENSION: &str = "intel";

/// Frontmatter key order of an `.intel` document
pub const FRONTMATTER_KEYS: [&str; 11] = [
    "id",
    "title",
    "created",
    "updated",
    "classification",
    "priority",
    "sources",
    "tags",
    "location",
    "summary",
    "confidence",
];

/// Deterministic `.intel` serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSerializer;

impl DocumentSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Build the frontmatter for a record
    pub fn frontmatter(&self, record: &IntelExportRecord) -> Frontmatter {
        use FrontmatterValue::{Json, List, Text};

        let mut fm = Frontmatter::new();
        fm.text("id", &record.id)
            .text("title", &record.title)
            .text("created", &record.created)
            .push("updated", record.updated.clone().map(Text))
            .text("classification", &record.classification)
            .text("priority", record.priority.as_str())
            .push("sources", Some(List(record.sources.clone())))
            .push("tags", record.tags.clone().map(List))
            .push(
                "location",
                record.location.as_ref().map(|loc| {
                    let mut value = json!({ "lat": loc.lat, "lon": loc.lon });
                    if let (Some(name), Value::Object(map)) = (&loc.name, &mut value) {
                        map.insert("name".to_string(), Value::String(name.clone()));
                    }
                    Json(value)
                }),
            )
            .push("summary", record.summary.clone().map(Text))
            .push(
                "confidence",
                record.confidence.as_ref().map(|c| match c {
                    Confidence::Score(n) => Json(Value::Number(n.clone())),
                    Confidence::Label(s) => Text(s.clone()),
                }),
            );
        fm
    }

    /// Serialize a record; identical records give byte-identical output.
    ///
    /// The body is written verbatim followed by one `\n`, so `x` and `x\n`
    /// stay distinguishable.
    pub fn serialize(&self, record: &IntelExportRecord) -> String {
        let mut doc = self.frontmatter(record).render();
        doc.push('\n');
        doc.push_str(&record.body);
        doc.push('\n');
        doc
    }
}

/// Serialize a record with the default serializer
pub fn serialize(record: &IntelExportRecord) -> String {
    DocumentSerializer.serialize(record)
}
