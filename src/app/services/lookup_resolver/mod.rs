//! Lookup resolver service for filename-to-identity resolution
//!
//! This module loads the external lookup table of known sensors and answers
//! "given this filename, what is the canonical identity?". The table is a
//! read-only snapshot owned by one invocation; callers reload it fresh for
//! every incoming file so table edits take effect without redeployment.

use crate::app::models::SensorRecord;

pub mod loader;
pub mod resolver;

#[cfg(test)]
pub mod tests;

/// Named resolution strategies for matching filenames against the table
///
/// Both filename conventions exist in production and both strategies are
/// exposed independently; the orchestrator selects one per flow rather
/// than merging them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Lenient: a record matches when its `file_name_key` is contained in
    /// the extension-stripped filename (file naming may carry a longer key
    /// than the table entry)
    Contains,

    /// Strict: a record matches when its `file_name_key` equals the
    /// filename after stripping the extension and the trailing two
    /// `_`-delimited timestamp tokens
    ExactAfterStrip,
}

/// In-memory snapshot of the lookup table
///
/// Records keep their table order; resolution always returns the first
/// match so ambiguous keys resolve deterministically.
#[derive(Debug, Clone)]
pub struct LookupTable {
    /// Sensor records in table order
    pub(crate) records: Vec<SensorRecord>,

    /// Where the table was loaded from, for log context
    pub(crate) source: String,

    /// Number of rows skipped during loading (blank or invalid)
    pub(crate) rows_skipped: usize,
}

impl LookupTable {
    /// Create a table from already-parsed records
    pub fn from_records(records: Vec<SensorRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
            rows_skipped: 0,
        }
    }

    /// Get the number of records in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the records in table order
    pub fn records(&self) -> &[SensorRecord] {
        &self.records
    }

    /// Get the source identifier the table was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the number of rows skipped during loading
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }
}
