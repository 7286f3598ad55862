//! Sensor Router Library
//!
//! A Rust library for routing and normalizing water-network sensor telemetry
//! files as they land in an object store.
//!
//! This library provides tools for:
//! - Resolving semi-structured raw filenames against an external lookup table
//! - Parsing filename and path conventions into structured components
//! - Normalizing raw tabular content into the canonical three-column schema
//! - Computing deterministic canonical destination keys
//! - Bulk-loading canonical files into an analytical warehouse sink
//! - Comprehensive error handling with file-scoped failure semantics

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod pipeline;
    pub mod services {
        pub mod content_normalizer;
        pub mod filename_parser;
        pub mod lookup_resolver;
        pub mod path_builder;
    }
    pub mod adapters {
        pub mod object_store;
        pub mod warehouse;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{NormalizedRow, SensorRecord, TankRole};
pub use app::pipeline::Router;
pub use config::RouterConfig;

/// Result type alias for the sensor router
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sensor routing operations
///
/// Every variant is file-scoped: a failure terminates processing of the
/// offending file only, never the whole batch or the process.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Path or filename has fewer segments/tokens than the convention requires
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// Filename could not be resolved against the lookup table
    #[error("No lookup table entry matches file '{file_key}'")]
    LookupNotFound { file_key: String },

    /// Lookup table violates the column-name contract or cannot be read
    #[error("Lookup table error: {message}")]
    LookupTable { message: String },

    /// Parsed column count does not match the mode's expectation
    #[error("Schema error in file '{file}': expected {expected} columns, found {actual}")]
    Schema {
        file: String,
        expected: usize,
        actual: usize,
    },

    /// Object store read/write/copy failed
    #[error("Store error for {bucket}/{key}: {message}")]
    Store {
        bucket: String,
        key: String,
        message: String,
    },

    /// Warehouse load job failed
    #[error("Sink load failed for table '{table_id}': {message}")]
    SinkLoad { table_id: String, message: String },

    /// Trigger event payload could not be normalized to {bucket, key}
    #[error("Invalid trigger event: {message}")]
    InvalidEvent { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a malformed path error
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a lookup not-found error
    pub fn lookup_not_found(file_key: impl Into<String>) -> Self {
        Self::LookupNotFound {
            file_key: file_key.into(),
        }
    }

    /// Create a lookup table error
    pub fn lookup_table(message: impl Into<String>) -> Self {
        Self::LookupTable {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(file: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Schema {
            file: file.into(),
            expected,
            actual,
        }
    }

    /// Create a store error
    pub fn store(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Store {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a sink load error
    pub fn sink_load(table_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkLoad {
            table_id: table_id.into(),
            message: message.into(),
        }
    }

    /// Create an invalid event error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
