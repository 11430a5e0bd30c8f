//! Feed record to export record mapping

use super::timestamp::{parse_timestamp, raw_text};
use crate::clock::{to_iso, Clock, SystemClock};
use crate::config::ExportConfig;
use crate::error::{IxError, Result};
use crate::feed::FeedRecord;
use crate::types::{
    derive_record_id, push_unique, Confidence, IntelExportRecord, Priority, ValidationWarning,
};
use std::sync::Arc;
use tracing::debug;

/// Maximum length (in chars) of a title derived from summary text
const DERIVED_TITLE_CHARS: usize = 120;

/// A mapped record together with the warnings raised while mapping it
#[derive(Debug, Clone)]
pub struct MappedRecord {
    /// The normalized record
    pub record: IntelExportRecord,
    /// Warnings, in the order they were raised
    pub warnings: Vec<ValidationWarning>,
}

/// Validates feed records and maps them into export records
pub struct RecordMapper {
    config: ExportConfig,
    clock: Arc<dyn Clock>,
}

impl RecordMapper {
    /// Create a mapper using the wall clock
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamp fallbacks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Mapper configuration
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Map a feed into an export record.
    ///
    /// Only a feed with no usable identity at all (no id, title, body text or
    /// link) fails; everything else degrades into warnings.
    pub fn map_and_validate(&self, feed: &FeedRecord) -> Result<MappedRecord> {
        if !feed.has_identity() {
            return Err(IxError::UnmappableRecord(
                "feed has no id, title, content, description, summary or link".to_string(),
            ));
        }

        let mut warnings = Vec::new();

        let timestamp = feed.timestamp.as_ref().or(feed.pub_date.as_ref());
        let id = non_blank(&feed.id).map(str::to_string).unwrap_or_else(|| {
            let raw_ts = timestamp.map(raw_text).unwrap_or_default();
            derive_record_id(&[
                non_blank(&feed.link).unwrap_or_default(),
                non_blank(&feed.title).unwrap_or_default(),
                raw_ts.as_str(),
            ])
        });

        let body = if non_blank(&feed.content).is_some() {
            feed.content.clone()
        } else {
            feed.description.clone()
        }
        .unwrap_or_default();

        let summary = non_blank(&feed.summary)
            .or_else(|| {
                // description doubles as a summary when the body came from content
                non_blank(&feed.content).and(non_blank(&feed.description))
            })
            .map(str::to_string);

        let title = match non_blank(&feed.title) {
            Some(title) => title.to_string(),
            None => non_blank(&feed.summary)
                .or_else(|| non_blank(&feed.description))
                .map(derive_title)
                .unwrap_or_else(|| format!("Untitled {}", id)),
        };

        let created = match timestamp.and_then(parse_timestamp) {
            Some(dt) => to_iso(&dt),
            None => {
                let message = match timestamp {
                    Some(ts) => format!(
                        "Invalid \"created\" timestamp '{}'; using current time",
                        raw_text(ts)
                    ),
                    None => "Missing \"created\" timestamp; using current time".to_string(),
                };
                warnings.push(ValidationWarning::warning("created", message));
                to_iso(&self.clock.now())
            }
        };

        let updated = match &feed.updated {
            Some(ts) => match parse_timestamp(ts) {
                Some(dt) => Some(to_iso(&dt)),
                None => {
                    warnings.push(ValidationWarning::warning(
                        "updated",
                        format!("Invalid \"updated\" timestamp '{}'; omitted", raw_text(ts)),
                    ));
                    None
                }
            },
            None => None,
        };

        let priority = match non_blank(&feed.priority) {
            Some(raw) => raw.parse::<Priority>().unwrap_or_else(|_| {
                warnings.push(ValidationWarning::warning(
                    "priority",
                    format!("Unknown priority '{}'; using medium", raw),
                ));
                Priority::Medium
            }),
            None => Priority::Medium,
        };

        let classification = non_blank(&feed.classification)
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_classification.clone());

        let mut sources = Vec::new();
        push_unique(&mut sources, feed.sources.iter().map(String::as_str));
        push_unique(
            &mut sources,
            [&feed.source, &feed.author, &feed.source_category]
                .into_iter()
                .filter_map(|f| f.as_deref()),
        );

        let mut tags = Vec::new();
        push_unique(&mut tags, feed.tags.iter().map(String::as_str));
        push_unique(&mut tags, feed.categories.iter().map(String::as_str));
        if tags.len() > self.config.max_tags {
            warnings.push(ValidationWarning::warning(
                "tags",
                format!(
                    "Tag count {} exceeds {}; all tags kept",
                    tags.len(),
                    self.config.max_tags
                ),
            ));
        }

        let location = match &feed.location {
            Some(loc) if loc.in_bounds() => {
                let mut loc = loc.clone();
                loc.name = non_blank(&loc.name).map(str::to_string);
                Some(loc)
            }
            Some(loc) => {
                warnings.push(ValidationWarning::error(
                    "location",
                    format!(
                        "Coordinates out of range (lat {}, lon {}); location omitted",
                        loc.lat, loc.lon
                    ),
                ));
                None
            }
            None => None,
        };

        let confidence = match &feed.confidence {
            Some(Confidence::Score(n)) => {
                if n.as_f64().is_some_and(|v| !(0.0..=100.0).contains(&v)) {
                    warnings.push(ValidationWarning::warning(
                        "confidence",
                        format!("Confidence {} is outside 0..=100", n),
                    ));
                }
                Some(Confidence::Score(n.clone()))
            }
            Some(Confidence::Label(label)) if !label.trim().is_empty() => {
                Some(Confidence::Label(label.trim().to_string()))
            }
            _ => None,
        };

        let body_bytes = body.len();
        if body_bytes > self.config.max_body_bytes {
            warnings.push(ValidationWarning::warning(
                "body",
                format!(
                    "Body size {} bytes exceeds {} bytes",
                    body_bytes, self.config.max_body_bytes
                ),
            ));
        }

        if !warnings.is_empty() {
            debug!("Record {} mapped with {} warning(s)", id, warnings.len());
        }

        Ok(MappedRecord {
            record: IntelExportRecord {
                id,
                title,
                created,
                updated,
                classification,
                priority,
                sources,
                tags: if tags.is_empty() { None } else { Some(tags) },
                location,
                summary,
                body,
                confidence,
            },
            warnings,
        })
    }
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn derive_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    first_line.chars().take(DERIVED_TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::feed::FeedTimestamp;
    use crate::types::{Location, WarningSeverity};
    use chrono::{TimeZone, Utc};

    fn mapper() -> RecordMapper {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RecordMapper::default().with_clock(Arc::new(FixedClock(now)))
    }

    fn feed() -> FeedRecord {
        FeedRecord::new("a", "T")
            .content("Body")
            .timestamp("2024-03-05T10:00:00Z")
            .source("S")
            .tag("X")
    }

    fn has_warning(warnings: &[ValidationWarning], needle: &str) -> bool {
        warnings.iter().any(|w| w.message.contains(needle))
    }

    #[test]
    fn test_basic_mapping() {
        let mapped = mapper().map_and_validate(&feed()).unwrap();
        let record = mapped.record;
        assert_eq!(record.id, "a");
        assert_eq!(record.title, "T");
        assert_eq!(record.body, "Body");
        assert_eq!(record.created, "2024-03-05T10:00:00.000Z");
        assert_eq!(record.classification, "UNCLASS");
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.sources, vec!["S"]);
        assert_eq!(record.tags, Some(vec!["X".to_string()]));
        assert!(record.updated.is_none());
        assert!(record.location.is_none());
        assert!(record.summary.is_none());
        assert!(record.confidence.is_none());
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn test_body_falls_back_to_description() {
        let mut f = feed();
        f.content = None;
        f.description = Some("From description".to_string());
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.body, "From description");
        assert!(record.summary.is_none());
    }

    #[test]
    fn test_description_becomes_summary_when_content_present() {
        let mut f = feed();
        f.description = Some("Short".to_string());
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.body, "Body");
        assert_eq!(record.summary.as_deref(), Some("Short"));
    }

    #[test]
    fn test_empty_body_is_not_an_error() {
        let mut f = feed();
        f.content = None;
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.body, "");
    }

    #[test]
    fn test_invalid_timestamp_falls_back_with_warning() {
        let f = feed().timestamp("yesterday-ish");
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.created, "2024-06-01T00:00:00.000Z");
        assert_eq!(mapped.warnings.len(), 1);
        assert_eq!(mapped.warnings[0].field, "created");
        assert!(mapped.warnings[0].message.contains("created"));
    }

    #[test]
    fn test_missing_timestamp_uses_pub_date() {
        let mut f = feed();
        f.timestamp = None;
        f.pub_date = Some(FeedTimestamp::from("Tue, 05 Mar 2024 10:00:00 GMT"));
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.created, "2024-03-05T10:00:00.000Z");
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn test_missing_timestamp_warns() {
        let mut f = feed();
        f.timestamp = None;
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.created, "2024-06-01T00:00:00.000Z");
        assert!(has_warning(&mapped.warnings, "created"));
    }

    #[test]
    fn test_sources_deduplicated_in_first_seen_order() {
        let mut f = feed().source("T").source("S");
        f.source = Some("Reuters".to_string());
        f.author = Some("S".to_string());
        f.source_category = Some("osint".to_string());
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.sources, vec!["S", "T", "Reuters", "osint"]);
    }

    #[test]
    fn test_tags_union_with_categories() {
        let mut f = feed().tag("Y").tag("X");
        f.categories = vec!["Z".to_string(), "Y".to_string(), "x".to_string()];
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(
            record.tags,
            Some(vec!["X".to_string(), "Y".to_string(), "Z".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn test_no_tags_is_none() {
        let mut f = feed();
        f.tags.clear();
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert!(record.tags.is_none());
    }

    #[test]
    fn test_tag_count_warning_keeps_all_tags() {
        let mut f = feed();
        f.tags = (0..30).map(|i| format!("tag-{}", i)).collect();
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.tag_list().len(), 30);
        assert!(has_warning(&mapped.warnings, "Tag count"));
    }

    #[test]
    fn test_tag_count_at_threshold_no_warning() {
        let mut f = feed();
        f.tags = (0..20).map(|i| format!("tag-{}", i)).collect();
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(!has_warning(&mapped.warnings, "Tag count"));
    }

    #[test]
    fn test_body_size_boundary() {
        for (len, warns) in [(204799, false), (204800, false), (204801, true)] {
            let f = feed().content("a".repeat(len));
            let mapped = mapper().map_and_validate(&f).unwrap();
            assert_eq!(
                has_warning(&mapped.warnings, "Body size"),
                warns,
                "body of {} bytes",
                len
            );
        }
    }

    #[test]
    fn test_body_size_counts_utf8_bytes() {
        // 'é' is two bytes in UTF-8
        let f = feed().content("é".repeat(102401));
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(has_warning(&mapped.warnings, "Body size"));
    }

    #[test]
    fn test_derived_id_is_stable() {
        let mut f = feed();
        f.id = None;
        f.link = Some("https://example.org/1".to_string());
        let a = mapper().map_and_validate(&f).unwrap().record.id;
        let b = mapper().map_and_validate(&f).unwrap().record.id;
        assert_eq!(a, b);
        assert!(a.starts_with("intel-"));
    }

    #[test]
    fn test_title_fallbacks() {
        let mut f = feed();
        f.title = None;
        f.description = Some("First line\nsecond line".to_string());
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.title, "First line");

        let mut f = feed();
        f.title = Some("  ".to_string());
        let record = mapper().map_and_validate(&f).unwrap().record;
        assert_eq!(record.title, "Untitled a");
    }

    #[test]
    fn test_unmappable_record_is_error() {
        let result = mapper().map_and_validate(&FeedRecord::default());
        assert!(matches!(result, Err(IxError::UnmappableRecord(_))));
    }

    #[test]
    fn test_priority_and_classification() {
        let mut f = feed();
        f.priority = Some("HIGH".to_string());
        f.classification = Some("SECRET".to_string());
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.priority, Priority::High);
        assert_eq!(mapped.record.classification, "SECRET");

        f.priority = Some("urgent".to_string());
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.priority, Priority::Medium);
        assert_eq!(mapped.warnings[0].field, "priority");
    }

    #[test]
    fn test_location_out_of_range_is_dropped() {
        let mut f = feed();
        f.location = Some(Location { lat: 123.0, lon: 0.0, name: None });
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(mapped.record.location.is_none());
        assert_eq!(mapped.warnings[0].field, "location");
        assert_eq!(mapped.warnings[0].severity, WarningSeverity::Error);

        f.location = Some(Location { lat: 50.45, lon: 30.52, name: Some("Kyiv".to_string()) });
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(mapped.record.location.is_some());
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn test_confidence_out_of_range_warns_but_keeps() {
        let mut f = feed();
        f.confidence = Some(serde_json::from_str("150").unwrap());
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(mapped.record.confidence.is_some());
        assert_eq!(mapped.warnings[0].field, "confidence");
    }

    #[test]
    fn test_invalid_updated_is_omitted() {
        let mut f = feed();
        f.updated = Some(FeedTimestamp::from("garbage"));
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert!(mapped.record.updated.is_none());
        assert_eq!(mapped.warnings[0].field, "updated");

        f.updated = Some(FeedTimestamp::from("2024-03-06T00:00:00Z"));
        let mapped = mapper().map_and_validate(&f).unwrap();
        assert_eq!(mapped.record.updated.as_deref(), Some("2024-03-06T00:00:00.000Z"));
    }
}
