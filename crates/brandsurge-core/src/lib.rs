//! Shared building blocks for brandsurge: the unified mention table,
//! source descriptors and application configuration.

pub mod app_config;
pub mod config;
pub mod sources;
pub mod table;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sources::{load_sources, SourceDescriptor, SourceFormat, SourcesFile};
pub use table::{columns, Cell, Record, Slice, Table};

use thiserror::Error;

/// Brand label used when no per-record, configured or filename brand exists.
pub const UNKNOWN_BRAND: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}
