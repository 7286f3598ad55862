//! Routing pipeline orchestration
//!
//! The `Router` ties the services together for the two flows:
//! - raw flow: parse the filename, resolve it against a freshly fetched
//!   lookup table, normalize the content, and write the canonical object;
//! - load flow: derive the table id from a canonical key and bulk-load the
//!   rows into the warehouse sink.
//!
//! Failures are file-scoped. Event handlers convert errors into logged
//! outcomes, and batch replay continues past failed files.

use crate::app::adapters::object_store::ObjectStore;
use crate::app::adapters::warehouse::{LoadJob, WarehouseSink};
use crate::app::services::content_normalizer::{normalize_canonical, normalize_raw, to_csv_bytes};
use crate::app::services::filename_parser::{
    parse_canonical_path, parse_raw_file_name, variable_from_path,
};
use crate::app::services::lookup_resolver::{LookupTable, MatchStrategy};
use crate::app::services::path_builder::build_canonical_key;
use crate::config::RouterConfig;
use crate::constants::{CSV_CONTENT_TYPE, CSV_EXTENSION};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{debug, error, info};

pub mod event;

#[cfg(test)]
pub mod tests;

pub use event::FileEvent;

/// Per-file outcome of an event invocation
///
/// Errors surface here as `Failed` with the rendered message; they never
/// propagate out of the event handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Raw file rewritten to its canonical destination key
    Routed { key: String, destination: String },

    /// Canonical file loaded into a warehouse table
    Loaded {
        key: String,
        table_id: String,
        rows: usize,
    },

    /// File could not be processed; the batch continues
    Failed { key: String, error: String },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Aggregate statistics for a batch replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_loaded: usize,
}

impl RouterStats {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Routed { .. } => self.files_processed += 1,
            FileOutcome::Loaded { rows, .. } => {
                self.files_processed += 1;
                self.rows_loaded += rows;
            }
            FileOutcome::Failed { .. } => self.files_failed += 1,
        }
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} file(s) processed, {} failed, {} row(s) loaded",
            self.files_processed, self.files_failed, self.rows_loaded
        )
    }
}

/// Orchestrates the raw-routing and warehouse-load flows
pub struct Router {
    store: Arc<dyn ObjectStore>,
    sink: Option<Arc<dyn WarehouseSink>>,
    config: RouterConfig,
}

impl Router {
    /// Create a router over an object store with validated configuration
    pub fn new(store: Arc<dyn ObjectStore>, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            sink: None,
            config,
        })
    }

    /// Attach a warehouse sink, enabling the load flow
    pub fn with_sink(mut self, sink: Arc<dyn WarehouseSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Fetch and parse the lookup table
    ///
    /// Always reads from the store, never caches: table edits must take
    /// effect on the next file without redeployment.
    pub async fn fetch_lookup_table(&self) -> Result<LookupTable> {
        let bytes = self
            .store
            .get(&self.config.config_bucket, &self.config.lookup_table_key)
            .await?;
        let source = format!(
            "{}/{}",
            self.config.config_bucket, self.config.lookup_table_key
        );
        LookupTable::from_csv_bytes(&bytes, &source)
    }

    /// Route a raw file to its canonical destination
    ///
    /// Returns the destination key written in the data bucket. An existing
    /// object at that key is overwritten; re-running the same input is
    /// idempotent.
    pub async fn route_raw_file(&self, bucket: &str, key: &str) -> Result<String> {
        let table = self.fetch_lookup_table().await?;
        let parsed = parse_raw_file_name(key)?;

        // Degraded single-timestamp names lose the token structure the
        // exact strategy strips on, so they fall back to substring matching
        let strategy = if parsed.degraded {
            MatchStrategy::Contains
        } else {
            MatchStrategy::ExactAfterStrip
        };
        let record = table.resolve(key, strategy)?;

        let bytes = self.store.get(bucket, key).await?;
        let rows = normalize_raw(&bytes, &record.sensor_id, key)?;
        let destination = build_canonical_key(record, &parsed.start, &parsed.end);
        let output = to_csv_bytes(&rows)?;

        self.store
            .put(&self.config.data_bucket, &destination, output, CSV_CONTENT_TYPE)
            .await?;

        info!(
            "Routed '{}' ({} rows) to '{}/{}'",
            key,
            rows.len(),
            self.config.data_bucket,
            destination
        );
        Ok(destination)
    }

    /// Load a canonical file into the warehouse sink
    ///
    /// The destination table id is `<dataset>.<variable>`, with the
    /// variable taken from the key's folder structure.
    pub async fn load_canonical_file(&self, bucket: &str, key: &str) -> Result<LoadJob> {
        let sink = self.sink.as_ref().ok_or_else(|| {
            Error::configuration("No warehouse sink configured for the load flow")
        })?;

        // Canonical keys routed by this pipeline always parse; keys written
        // by other producers may not, and the variable folder is all the
        // load flow actually requires
        if let Ok(parsed) = parse_canonical_path(key) {
            debug!(
                "Canonical identity: {}/{}/{}, location '{}', range {}..{}",
                parsed.city,
                parsed.district,
                parsed.sensor_type,
                parsed.location,
                parsed.start_date,
                parsed.end_date
            );
        }

        let variable = variable_from_path(key)?;
        let table_id = format!("{}.{}", self.config.dataset, variable);

        let bytes = self.store.get(bucket, key).await?;
        let rows = normalize_canonical(&bytes, key)?;
        let job = sink.load(&table_id, &rows).await?;

        info!(
            "Loaded '{}' ({} rows) into table '{}'",
            key, job.rows_loaded, job.table_id
        );
        Ok(job)
    }

    /// Handle a raw-file arrival event, converting errors into an outcome
    pub async fn handle_raw_event(&self, event: &FileEvent) -> FileOutcome {
        info!("Processing raw file: {}/{}", event.bucket, event.key);
        match self.route_raw_file(&event.bucket, &event.key).await {
            Ok(destination) => FileOutcome::Routed {
                key: event.key.clone(),
                destination,
            },
            Err(e) => {
                error!("Failed to route '{}': {}", event.key, e);
                FileOutcome::Failed {
                    key: event.key.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Handle a canonical-file arrival event, converting errors into an outcome
    pub async fn handle_canonical_event(&self, event: &FileEvent) -> FileOutcome {
        info!("Processing canonical file: {}/{}", event.bucket, event.key);
        match self.load_canonical_file(&event.bucket, &event.key).await {
            Ok(job) => FileOutcome::Loaded {
                key: event.key.clone(),
                table_id: job.table_id,
                rows: job.rows_loaded,
            },
            Err(e) => {
                error!("Failed to load '{}': {}", event.key, e);
                FileOutcome::Failed {
                    key: event.key.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Replay every raw CSV under a prefix through the routing flow
    pub async fn replay_raw_prefix(&self, bucket: &str, prefix: &str) -> Result<RouterStats> {
        self.replay_prefix(bucket, prefix, true).await
    }

    /// Replay every canonical CSV under a prefix through the load flow
    pub async fn replay_canonical_prefix(&self, bucket: &str, prefix: &str) -> Result<RouterStats> {
        self.replay_prefix(bucket, prefix, false).await
    }

    async fn replay_prefix(&self, bucket: &str, prefix: &str, raw: bool) -> Result<RouterStats> {
        let extension_suffix = format!(".{CSV_EXTENSION}");
        let keys: Vec<String> = self
            .store
            .list(bucket, prefix)
            .await?
            .into_iter()
            .filter(|key| key.ends_with(&extension_suffix))
            .collect();

        info!(
            "Replaying {} file(s) from {}/{} with {} worker(s)",
            keys.len(),
            bucket,
            prefix,
            self.config.workers
        );

        let progress = create_progress_bar(keys.len() as u64);
        let outcomes: Vec<FileOutcome> = stream::iter(keys)
            .map(|key| {
                let progress = progress.clone();
                async move {
                    let event = FileEvent {
                        bucket: bucket.to_string(),
                        key,
                    };
                    let outcome = if raw {
                        self.handle_raw_event(&event).await
                    } else {
                        self.handle_canonical_event(&event).await
                    };
                    progress.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.config.workers)
            .collect()
            .await;
        progress.finish_and_clear();

        let mut stats = RouterStats::default();
        for outcome in &outcomes {
            stats.record(outcome);
        }

        info!("Replay complete: {}", stats.summary());
        Ok(stats)
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress
}
