//! Mention ingestion: load heterogeneous brand-mention exports, normalize
//! them into the unified table and prepare it for metrics.

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod loader;
pub mod prepare;
pub mod vendor;

pub use aggregate::{load_all, load_all_concurrent, LoadOutcome, SourceReport, SourceStatus};
pub use dates::{parse_timestamp, parse_timestamp_str};
pub use error::IngestError;
pub use loader::{load_source, LoadedSource};
pub use prepare::{prepare, prepared, sentiment_score};
pub use vendor::{normalize_document, normalize_documents, NormalizeOutcome, SkippedRecord};
