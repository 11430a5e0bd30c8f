//! Error types for intelx

use thiserror::Error;

/// Main error type for intelx
#[derive(Debug, Error)]
pub enum IxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Zip archive error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A feed record carries nothing an export record can be built from
    #[error("Unmappable record: {0}")]
    UnmappableRecord(String),

    /// Provenance bundle is not a JSON object
    #[error("Invalid provenance bundle: {0}")]
    InvalidProvenance(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<IxError>,
    },
}

impl IxError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        IxError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for intelx
pub type Result<T> = std::result::Result<T, IxError>;
