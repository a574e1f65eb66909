//! Time-boxed snapshot of the prepared mention table.
//!
//! The table is rebuilt from scratch once it is older than the configured
//! TTL. Readers hold an `Arc` to the snapshot they were handed, so a rebuild
//! never changes data under an in-flight request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use brandsurge_core::{SourceDescriptor, Table};
use brandsurge_ingest::{load_all_concurrent, prepared};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// One immutable build of the prepared table.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub table: Arc<Table>,
    pub built_at: DateTime<Utc>,
    pub skipped_sources: usize,
    loaded_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }
}

#[derive(Debug)]
pub struct SnapshotCache {
    sources: Vec<SourceDescriptor>,
    ttl: Duration,
    max_concurrent: usize,
    current: Mutex<Option<Snapshot>>,
}

impl SnapshotCache {
    #[must_use]
    pub fn new(sources: Vec<SourceDescriptor>, ttl: Duration, max_concurrent: usize) -> Self {
        Self {
            sources,
            ttl,
            max_concurrent,
            current: Mutex::new(None),
        }
    }

    /// The current snapshot, rebuilding it first if it is missing or stale.
    ///
    /// Concurrent callers during a rebuild wait for it rather than starting
    /// their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the preparation task panics.
    pub async fn get(&self) -> anyhow::Result<Snapshot> {
        let mut current = self.current.lock().await;
        if let Some(snapshot) = current.as_ref().filter(|s| s.is_fresh(self.ttl)) {
            return Ok(snapshot.clone());
        }
        let snapshot = self.build().await?;
        *current = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Discards the current snapshot and builds a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the preparation task panics.
    pub async fn refresh(&self) -> anyhow::Result<Snapshot> {
        let mut current = self.current.lock().await;
        let snapshot = self.build().await?;
        *current = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// When the held snapshot was built, without triggering a rebuild.
    pub async fn built_at(&self) -> Option<DateTime<Utc>> {
        self.current.lock().await.as_ref().map(|s| s.built_at)
    }

    async fn build(&self) -> anyhow::Result<Snapshot> {
        let started = Instant::now();
        let outcome = load_all_concurrent(&self.sources, self.max_concurrent).await;
        let skipped_sources = outcome.skipped_sources();
        let table = tokio::task::spawn_blocking(move || prepared(outcome.table)).await?;

        tracing::info!(
            rows = table.len(),
            skipped_sources,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "rebuilt mention snapshot"
        );

        Ok(Snapshot {
            table: Arc::new(table),
            built_at: Utc::now(),
            skipped_sources,
            loaded_at: Instant::now(),
        })
    }
}
