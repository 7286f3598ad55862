//! Application constants for the sensor router
//!
//! This module contains the filename/path conventions, lookup table column
//! contract, and default values used throughout the router.

// =============================================================================
// Lookup Table Column Contract
// =============================================================================

/// Required lookup table column headers
///
/// The exact header names are a contract with the external table maintainer.
pub mod lookup_columns {
    pub const FILE_NAME: &str = "File Name";
    pub const CITY: &str = "City";
    pub const DISTRICT: &str = "District";
    pub const VARIABLE: &str = "Variable";
    pub const TANK: &str = "Tank";
    pub const SENSOR_ID: &str = "Sensor ID";

    /// All required columns, in contract order
    pub const REQUIRED: &[&str] = &[FILE_NAME, CITY, DISTRICT, VARIABLE, TANK, SENSOR_ID];
}

// =============================================================================
// Tank Qualifier Markers
// =============================================================================

/// Marker in the Tank column indicating the sensor monitors a tank
pub const TANK_MARKER: &str = "Yes";

/// Sub-marker in the Tank column distinguishing inflow from outflow
pub const TANK_IN_MARKER: &str = "in";

/// Filename segment for tank inflow sensors
pub const TANK_IN_SEGMENT: &str = "tank_in";

/// Filename segment for tank outflow sensors
pub const TANK_OUT_SEGMENT: &str = "tank_out";

// =============================================================================
// File Format Conventions
// =============================================================================

/// File extension for both raw and canonical files
pub const CSV_EXTENSION: &str = "csv";

/// Content type for canonical destination writes
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Header row of every canonical three-column file
pub const OUTPUT_HEADER: [&str; 3] = ["Sensor ID", "Timestamp", "Value"];

/// Column count expected by the semicolon-delimited raw mode
pub const RAW_COLUMN_COUNT: usize = 2;

/// Column count expected by the comma-delimited canonical mode
pub const CANONICAL_COLUMN_COUNT: usize = 3;

/// Timestamp formats accepted during permissive coercion, tried in order
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only formats accepted during permissive coercion (midnight assumed)
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y%m%d"];

/// Timestamp format used when serializing canonical rows
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Default Configuration Values
// =============================================================================

/// Default bucket holding configuration artifacts (the lookup table)
pub const DEFAULT_CONFIG_BUCKET: &str = "sdw-config-files";

/// Default destination bucket for canonical sensor data
pub const DEFAULT_DATA_BUCKET: &str = "sdw-sensor-data";

/// Default object key of the lookup table within the config bucket
pub const DEFAULT_LOOKUP_TABLE_KEY: &str = "lookup_table/lookup_table.csv";

/// Default warehouse dataset; table ids are `<dataset>.<variable>`
pub const DEFAULT_DATASET: &str = "sensor_measurement";

/// Default number of concurrent file invocations during batch replay
pub const DEFAULT_PARALLEL_WORKERS: usize = 4;
