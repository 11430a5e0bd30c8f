//! Record mapping and validation
//!
//! Turns loosely-shaped feed items into [`IntelExportRecord`]s, collecting
//! non-fatal [`ValidationWarning`]s along the way.
//!
//! [`IntelExportRecord`]: crate::types::IntelExportRecord
//! [`ValidationWarning`]: crate::types::ValidationWarning

mod record_mapper;
pub mod timestamp;

pub use record_mapper::{MappedRecord, RecordMapper};
