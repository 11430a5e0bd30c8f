//! File system storage for export artifacts

use crate::atomic::write_atomic;
use ix_core::batch::{JsonReportExport, ReportExport, ZipExport};
use ix_core::error::{IxError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes produced artifacts into an output directory
pub struct ArtifactStore {
    /// Directory artifacts are written to
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store, creating the output directory if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            output_dir: output_dir.into(),
        };
        store.ensure_dir()?;
        Ok(store)
    }

    /// Default output directory under the platform data directory
    pub fn default_dir() -> PathBuf {
        let base_dir = directories::ProjectDirs::from("com", "intelx", "intelx")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".intelx")
            });

        base_dir.join("exports")
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).map_err(|e| {
                IxError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create output directory: {}", e),
                ))
            })?;
            debug!("Created output directory: {:?}", self.output_dir);
        }
        Ok(())
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write raw bytes under `file_name`, returning the final path
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(file_name);
        let is_plain_name = name.file_name().map(|n| n == name.as_os_str()).unwrap_or(false);
        if !is_plain_name {
            return Err(IxError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Artifact name must be a plain file name: {}", file_name),
            )));
        }

        let path = self.output_dir.join(name);
        write_atomic(&path, bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Write a zip bundle
    pub fn write_zip(&self, export: &ZipExport) -> Result<PathBuf> {
        self.write(&export.file_name, &export.bytes)
    }

    /// Write an `.intelreport` document
    pub fn write_report(&self, export: &ReportExport) -> Result<PathBuf> {
        self.write(&export.file_name, export.serialized.as_bytes())
    }

    /// Write a JSON report
    pub fn write_json_report(&self, export: &JsonReportExport) -> Result<PathBuf> {
        self.write(&export.file_name, export.json.as_bytes())
    }
}
