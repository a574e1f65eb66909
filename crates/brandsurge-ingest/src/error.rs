use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no columns to parse in {}", path.display())]
    EmptyTabular { path: PathBuf },

    #[error("JSON parse error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected vendor export shape in {}: {reason}", path.display())]
    UnexpectedVendorShape { path: PathBuf, reason: String },

    #[error("unsupported JSON shape in {}: {reason}", path.display())]
    UnsupportedShape { path: PathBuf, reason: String },

    #[error("loader task failed: {0}")]
    Task(String),
}

impl IngestError {
    /// Read failures caused by a missing file. Logged as warnings, not errors.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            IngestError::NotFound { .. } => true,
            IngestError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
