//! Ingestion aggregator: load every configured source and concatenate the
//! results into one table.

use std::path::PathBuf;

use brandsurge_core::{columns, SourceDescriptor, SourceFormat, Table};
use futures::stream::{self, StreamExt};

use crate::error::IngestError;
use crate::loader::{load_source, LoadedSource};

/// What happened to one source during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded { rows: usize, skipped_records: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub location: PathBuf,
    pub format: SourceFormat,
    pub status: SourceStatus,
}

/// The combined table plus a per-source account of the load.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub table: Table,
    pub reports: Vec<SourceReport>,
}

impl LoadOutcome {
    /// Number of sources that were skipped entirely.
    #[must_use]
    pub fn skipped_sources(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, SourceStatus::Skipped { .. }))
            .count()
    }
}

/// Loads every source in order and concatenates the results.
///
/// Per-source failures are logged and recorded in the outcome's reports;
/// they never abort the batch. When no source yields a table, the result is
/// an empty table carrying [`columns::MINIMAL`].
#[must_use]
pub fn load_all(sources: &[SourceDescriptor]) -> LoadOutcome {
    let results = sources.iter().map(load_source).collect();
    fold_results(sources, results)
}

/// Like [`load_all`], but reads up to `max_concurrent` sources at once on
/// the blocking thread pool. Source order is preserved in the output.
pub async fn load_all_concurrent(sources: &[SourceDescriptor], max_concurrent: usize) -> LoadOutcome {
    let results: Vec<Result<LoadedSource, IngestError>> = stream::iter(sources.iter().cloned())
        .map(|descriptor| async move {
            tokio::task::spawn_blocking(move || load_source(&descriptor))
                .await
                .map_err(|e| IngestError::Task(e.to_string()))?
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    fold_results(sources, results)
}

fn fold_results(
    sources: &[SourceDescriptor],
    results: Vec<Result<LoadedSource, IngestError>>,
) -> LoadOutcome {
    let mut tables = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());

    for (descriptor, result) in sources.iter().zip(results) {
        let status = match result {
            Ok(loaded) => {
                let status = SourceStatus::Loaded {
                    rows: loaded.table.len(),
                    skipped_records: loaded.skipped_records.len(),
                };
                tables.push(loaded.table);
                status
            }
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!(
                        source = %descriptor.location.display(),
                        "source file not found, skipping"
                    );
                } else {
                    tracing::error!(
                        source = %descriptor.location.display(),
                        format = %descriptor.format,
                        error = %e,
                        "failed to load source, skipping"
                    );
                }
                SourceStatus::Skipped {
                    reason: e.to_string(),
                }
            }
        };
        reports.push(SourceReport {
            location: descriptor.location.clone(),
            format: descriptor.format,
            status,
        });
    }

    let table = if tables.is_empty() {
        Table::with_columns(columns::MINIMAL)
    } else {
        Table::concat(tables)
    };

    let outcome = LoadOutcome { table, reports };
    tracing::info!(
        sources = sources.len(),
        skipped_sources = outcome.skipped_sources(),
        rows = outcome.table.len(),
        "aggregated sources"
    );
    outcome
}
