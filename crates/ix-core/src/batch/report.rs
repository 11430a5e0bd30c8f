//! Aggregate `.intelreport` and JSON report

use super::exporter::{BatchExporter, BatchOptions, PreparedBatch};
use super::warning::{BatchWarning, BatchWarningKind};
use crate::clock::to_iso;
use crate::document::{Frontmatter, FrontmatterValue};
use crate::error::Result;
use crate::feed::FeedRecord;
use crate::types::{push_unique, Priority};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// File extension of an aggregate report
pub const REPORT_EXTENSION: &str = "intelreport";

/// Per-article payload embedded in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArticle {
    pub id: String,
    pub title: String,
    pub created: String,
    pub priority: Priority,
    pub sources: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Entry name the article has in the zip bundle
    pub intel_file: String,
    /// Full `.intel` document
    pub intel_content: String,
}

/// JSON mirror of the markdown report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportJson {
    pub id: String,
    pub title: String,
    pub created: String,
    pub classification: String,
    pub priority: Priority,
    pub sources: Vec<String>,
    pub tags: Vec<String>,
    pub article_count: usize,
    pub articles: Vec<ReportArticle>,
}

/// Result of a markdown report export
#[derive(Debug, Clone)]
pub struct ReportExport {
    /// Suggested file name
    pub file_name: String,
    /// Report text
    pub serialized: String,
    /// Batch warnings
    pub warnings: Vec<BatchWarning>,
}

/// Result of a JSON report export
#[derive(Debug, Clone)]
pub struct JsonReportExport {
    /// Suggested file name
    pub file_name: String,
    /// Pretty-printed JSON
    pub json: String,
    /// Batch warnings
    pub warnings: Vec<BatchWarning>,
}

impl BatchExporter {
    /// Build the aggregate report data shared by both report formats
    fn build_report(&self, feeds: &[FeedRecord], options: BatchOptions) -> (ReportJson, Vec<BatchWarning>) {
        let limit = self.effective_limit(options);
        let PreparedBatch {
            documents,
            mut warnings,
        } = self.prepare(feeds, limit);

        if feeds.len() > limit {
            warn!("Report truncated to {} of {} feeds", limit, feeds.len());
            warnings.push(BatchWarning::new(
                BatchWarningKind::Truncated,
                format!(
                    "Report truncated: {} of {} feeds included (limit {})",
                    limit.min(feeds.len()),
                    feeds.len(),
                    limit
                ),
            ));
        }

        let mut sources = Vec::new();
        let mut tags = Vec::new();
        for doc in &documents {
            push_unique(&mut sources, doc.record.sources.iter().map(String::as_str));
            push_unique(&mut tags, doc.record.tag_list().iter().map(String::as_str));
        }
        sources.truncate(self.report.source_cap);
        tags.truncate(self.report.tag_cap);

        let priority = documents
            .iter()
            .map(|d| d.record.priority)
            .max()
            .unwrap_or_default();

        let now = self.clock.now();
        let articles: Vec<ReportArticle> = documents
            .into_iter()
            .map(|doc| ReportArticle {
                tags: doc.record.tag_list().to_vec(),
                id: doc.record.id,
                title: doc.record.title,
                created: doc.record.created,
                priority: doc.record.priority,
                sources: doc.record.sources,
                summary: doc.record.summary,
                intel_file: doc.file_name,
                intel_content: doc.content,
            })
            .collect();

        let report = ReportJson {
            id: format!("intel-report-{}", now.format("%Y%m%d%H%M%S")),
            title: self.report.title.clone(),
            created: to_iso(&now),
            classification: self.mapper.config().default_classification.clone(),
            priority,
            sources,
            tags,
            article_count: articles.len(),
            articles,
        };

        (report, warnings)
    }

    fn report_file_stem(&self) -> String {
        format!("intel-report-{}", self.clock.now().format("%Y%m%d-%H%M%S"))
    }

    /// Export an aggregate `.intelreport` document embedding every article's
    /// `.intel` document in a fenced JSON block.
    pub fn export_report(&self, feeds: &[FeedRecord], options: BatchOptions) -> Result<ReportExport> {
        let (report, warnings) = self.build_report(feeds, options);

        let mut fm = Frontmatter::new();
        fm.text("id", &report.id)
            .text("title", &report.title)
            .text("created", &report.created)
            .text("classification", &report.classification)
            .text("priority", report.priority.as_str())
            .push("sources", Some(FrontmatterValue::List(report.sources.clone())))
            .push("tags", Some(FrontmatterValue::List(report.tags.clone())))
            .push(
                "articleCount",
                Some(FrontmatterValue::Json(report.article_count.into())),
            );

        let articles_json = serde_json::to_string_pretty(&report.articles)?;

        let mut serialized = fm.render();
        serialized.push('\n');
        serialized.push_str(&format!("# {}\n\n", report.title));
        serialized.push_str(&format!(
            "This report contains {} {}.\n\n",
            report.article_count,
            if report.article_count == 1 { "article" } else { "articles" }
        ));
        serialized.push_str("```json\n");
        serialized.push_str(&articles_json);
        serialized.push_str("\n```\n");

        let file_name = format!("{}.{}", self.report_file_stem(), REPORT_EXTENSION);
        info!(
            "Built report {} with {} article(s)",
            file_name, report.article_count
        );

        Ok(ReportExport {
            file_name,
            serialized,
            warnings,
        })
    }

    /// Export the report as a JSON object
    pub fn export_report_json(
        &self,
        feeds: &[FeedRecord],
        options: BatchOptions,
    ) -> Result<JsonReportExport> {
        let (report, warnings) = self.build_report(feeds, options);
        let json = serde_json::to_string_pretty(&report)?;

        Ok(JsonReportExport {
            file_name: format!("{}.json", self.report_file_stem()),
            json,
            warnings,
        })
    }
}
