//! Batch exporter and zip bundle

use super::naming::FileNameAllocator;
use super::warning::{BatchWarning, BatchWarningKind};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ReportConfig};
use crate::document::{DocumentSerializer, INTEL_EXTENSION};
use crate::error::Result;
use crate::feed::FeedRecord;
use crate::mapper::RecordMapper;
use crate::types::IntelExportRecord;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Options for a batch call
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Maximum number of feeds processed; the configured default when `None`
    pub limit: Option<usize>,
}

impl BatchOptions {
    /// Options with an explicit limit
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// Result of a zip export
#[derive(Debug, Clone)]
pub struct ZipExport {
    /// Suggested archive file name
    pub file_name: String,
    /// Number of documents written
    pub count: usize,
    /// Entry names in archive order
    pub file_names: Vec<String>,
    /// Batch warnings
    pub warnings: Vec<BatchWarning>,
    /// Archive bytes
    pub bytes: Vec<u8>,
}

/// A record ready to be written, with its collision-resolved name
#[derive(Debug, Clone)]
pub(crate) struct PreparedDocument {
    pub record: IntelExportRecord,
    pub file_name: String,
    pub content: String,
}

/// Output of the sequential map/name/serialize pass
#[derive(Debug, Default)]
pub(crate) struct PreparedBatch {
    pub documents: Vec<PreparedDocument>,
    pub warnings: Vec<BatchWarning>,
}

/// Exports many feeds at once as a zip bundle or an aggregate report
pub struct BatchExporter {
    pub(crate) mapper: RecordMapper,
    pub(crate) serializer: DocumentSerializer,
    pub(crate) report: ReportConfig,
    pub(crate) default_limit: usize,
    pub(crate) clock: Arc<dyn Clock>,
}

impl BatchExporter {
    /// Create an exporter from configuration, using the wall clock
    pub fn new(config: &Config) -> Self {
        Self {
            mapper: RecordMapper::new(config.export.clone()),
            serializer: DocumentSerializer::new(),
            report: config.report.clone(),
            default_limit: config.export.default_limit,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for artifact names and timestamp fallbacks
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            mapper: self.mapper.with_clock(clock.clone()),
            clock,
            ..self
        }
    }

    /// The mapper used for individual records
    pub fn mapper(&self) -> &RecordMapper {
        &self.mapper
    }

    pub(crate) fn effective_limit(&self, options: BatchOptions) -> usize {
        options.limit.unwrap_or(self.default_limit)
    }

    /// Map, name and serialize the selected slice of feeds in input order.
    ///
    /// Must run sequentially: collision suffixes depend on processing order.
    /// The whole slice is mapped before naming so a suffix never takes the
    /// natural name of a later record.
    pub(crate) fn prepare(&self, feeds: &[FeedRecord], limit: usize) -> PreparedBatch {
        let mut batch = PreparedBatch::default();

        if feeds.is_empty() {
            batch
                .warnings
                .push(BatchWarning::new(BatchWarningKind::Empty, "No feeds to export"));
            return batch;
        }

        let mut mapped_records = Vec::new();
        for (index, feed) in feeds.iter().take(limit).enumerate() {
            match self.mapper.map_and_validate(feed) {
                Ok(mapped) => mapped_records.push(mapped),
                Err(e) => {
                    warn!("Skipping feed #{}: {}", index, e);
                    batch.warnings.push(BatchWarning::new(
                        BatchWarningKind::Skipped,
                        format!("Feed #{} skipped: {}", index, e),
                    ));
                }
            }
        }

        // every id owns its natural name before any suffix is handed out
        let mut names = FileNameAllocator::new(INTEL_EXTENSION);
        for mapped in &mapped_records {
            names.reserve(&mapped.record.id);
        }

        for mapped in mapped_records {

            let id = mapped.record.id.clone();
            batch.warnings.extend(
                mapped
                    .warnings
                    .iter()
                    .map(|w| BatchWarning::from_validation(&id, w)),
            );

            let allocated = names.allocate(&id);
            if allocated.collided {
                debug!("Id '{}' collided, written as {}", id, allocated.file_name);
                batch.warnings.push(
                    BatchWarning::new(
                        BatchWarningKind::Collision,
                        format!(
                            "Duplicate id '{}' written as {}",
                            id, allocated.file_name
                        ),
                    )
                    .for_record(&id),
                );
            }

            let content = self.serializer.serialize(&mapped.record);
            batch.documents.push(PreparedDocument {
                record: mapped.record,
                file_name: allocated.file_name,
                content,
            });
        }

        batch
    }

    /// Build a zip of `.intel` documents, one per feed, at most `limit` feeds.
    ///
    /// Feeds past the limit are left out without a warning.
    pub fn export_zip(&self, feeds: &[FeedRecord], options: BatchOptions) -> Result<ZipExport> {
        let limit = self.effective_limit(options);
        let batch = self.prepare(feeds, limit);

        let bytes = write_archive(&batch.documents)?;
        let file_names: Vec<String> = batch
            .documents
            .iter()
            .map(|d| d.file_name.clone())
            .collect();

        let now = self.clock.now();
        let file_name = format!("intel-export-{}.zip", now.format("%Y%m%d-%H%M%S"));

        info!(
            "Exported {} document(s) to {} ({} warning(s))",
            file_names.len(),
            file_name,
            batch.warnings.len()
        );

        Ok(ZipExport {
            file_name,
            count: file_names.len(),
            file_names,
            warnings: batch.warnings,
            bytes,
        })
    }
}

impl Default for BatchExporter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Write documents into an in-memory zip with fixed entry metadata
fn write_archive(documents: &[PreparedDocument]) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for doc in documents {
            zip.start_file(doc.file_name.as_str(), options)?;
            zip.write_all(doc.content.as_bytes())?;
        }

        zip.finish()?;
    }
    Ok(buffer.into_inner())
}
