//! Warehouse sink abstraction
//!
//! The bulk-load flow appends normalized rows to an analytical table keyed
//! by a dotted table id (`{dataset}.{variable}`). The trait hides the
//! concrete warehouse so the pipeline can be exercised against a directory
//! of CSV files or an in-memory recorder.

use crate::app::models::NormalizedRow;
use crate::constants::OUTPUT_HEADER;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Outcome of a completed load job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    pub table_id: String,
    pub rows_loaded: usize,
}

/// Append-only analytical table sink keyed by dotted table id
#[async_trait]
pub trait WarehouseSink: Send + Sync {
    /// Append rows to the named table, creating it if absent
    async fn load(&self, table_id: &str, rows: &[NormalizedRow]) -> Result<LoadJob>;
}

// =============================================================================
// CSV Directory Sink
// =============================================================================

/// Sink that appends each table to `root/{table_id}.csv`
///
/// A stand-in warehouse for local runs: one file per table id, header
/// written on creation, rows appended on every load. Appends are
/// serialized through a lock; batch replay runs loads concurrently and
/// unserialized writes to the same table would drop rows.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    root: PathBuf,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl CsvDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn table_path(&self, table_id: &str) -> PathBuf {
        self.root.join(format!("{table_id}.csv"))
    }
}

#[async_trait]
impl WarehouseSink for CsvDirSink {
    async fn load(&self, table_id: &str, rows: &[NormalizedRow]) -> Result<LoadJob> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::sink_load(table_id, format!("failed to create sink root: {e}")))?;

        let path = self.table_path(table_id);

        // Held across the existence check and the append so concurrent
        // loads cannot interleave
        let _guard = self.write_lock.lock().await;
        let is_new = !path.exists();

        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        if is_new {
            writer
                .write_record(OUTPUT_HEADER)
                .map_err(|e| Error::sink_load(table_id, format!("failed to write header: {e}")))?;
        }
        for row in rows {
            writer
                .write_record([
                    row.sensor_id.as_str(),
                    row.timestamp_field().as_str(),
                    row.value_field().as_str(),
                ])
                .map_err(|e| Error::sink_load(table_id, format!("failed to write row: {e}")))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::sink_load(table_id, format!("failed to flush rows: {e}")))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::sink_load(table_id, format!("failed to open table: {e}")))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| Error::sink_load(table_id, format!("failed to append table: {e}")))?;
        file.flush()
            .await
            .map_err(|e| Error::sink_load(table_id, format!("failed to flush table: {e}")))?;

        debug!("Loaded {} rows into table '{}'", rows.len(), table_id);
        Ok(LoadJob {
            table_id: table_id.to_string(),
            rows_loaded: rows.len(),
        })
    }
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// Sink that records every load for test assertions
#[derive(Debug, Default)]
pub struct MemorySink {
    loads: Mutex<Vec<(String, Vec<NormalizedRow>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All loads in arrival order as `(table_id, rows)` pairs
    pub fn loads(&self) -> Vec<(String, Vec<NormalizedRow>)> {
        self.loads.lock().unwrap().clone()
    }

    /// Total rows loaded into the named table across all loads
    pub fn rows_for(&self, table_id: &str) -> usize {
        self.loads
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == table_id)
            .map(|(_, rows)| rows.len())
            .sum()
    }
}

#[async_trait]
impl WarehouseSink for MemorySink {
    async fn load(&self, table_id: &str, rows: &[NormalizedRow]) -> Result<LoadJob> {
        self.loads
            .lock()
            .unwrap()
            .push((table_id.to_string(), rows.to_vec()));
        Ok(LoadJob {
            table_id: table_id.to_string(),
            rows_loaded: rows.len(),
        })
    }
}
