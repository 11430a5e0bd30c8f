//! Batch export
//!
//! Two outputs are built from the same sequential pass over the input:
//! - a zip bundle of `.intel` documents with collision-safe entry names
//! - an aggregate report, as `.intelreport` markdown or JSON
//!
//! # Example
//!
//! ```ignore
//! use ix_core::batch::{BatchExporter, BatchOptions};
//!
//! let exporter = BatchExporter::default();
//! let bundle = exporter.export_zip(&feeds, BatchOptions::with_limit(50))?;
//! let report = exporter.export_report(&feeds, BatchOptions::default())?;
//! ```

mod exporter;
mod naming;
mod report;
mod warning;

pub use exporter::{BatchExporter, BatchOptions, ZipExport};
pub use naming::{sanitize_stem, AllocatedName, FileNameAllocator};
pub use report::{JsonReportExport, ReportArticle, ReportExport, ReportJson, REPORT_EXTENSION};
pub use warning::{count_kind, BatchWarning, BatchWarningKind};
