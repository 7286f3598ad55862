//! Data models for sensor routing
//!
//! This module contains the core data structures: the canonical sensor
//! identity recovered from the lookup table, and the normalized
//! three-column row written to canonical files and loaded into the
//! warehouse sink.

use crate::constants::{OUTPUT_TIMESTAMP_FORMAT, TANK_IN_MARKER, TANK_IN_SEGMENT, TANK_MARKER, TANK_OUT_SEGMENT};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Sensor Record Structure
// =============================================================================

/// One row of the lookup table: the canonical identity of a sensor
///
/// Rows are immutable snapshots owned by a single invocation; the table is
/// reloaded fresh for every incoming file. `file_name_key` need not be
/// globally unique — the resolver picks the first match in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Key matched against incoming raw filenames
    pub file_name_key: String,

    /// City the sensor is installed in, table-provided casing (e.g. "Marene")
    pub city: String,

    /// District within the city, table-provided casing
    pub district: String,

    /// Measured quantity (e.g. "Flow", "Pressure", "Level")
    pub variable: String,

    /// Tank role parsed from the table's free-text Tank column
    pub tank: TankRole,

    /// Canonical sensor identifier injected into normalized rows
    pub sensor_id: String,
}

impl SensorRecord {
    /// Create a new record with validation
    pub fn new(
        file_name_key: String,
        city: String,
        district: String,
        variable: String,
        tank: TankRole,
        sensor_id: String,
    ) -> Result<Self> {
        let record = Self {
            file_name_key,
            city,
            district,
            variable,
            tank,
            sensor_id,
        };

        record.validate()?;
        Ok(record)
    }

    /// Validate record fields for consistency
    pub fn validate(&self) -> Result<()> {
        if self.file_name_key.trim().is_empty() {
            return Err(Error::lookup_table(
                "File Name key cannot be empty".to_string(),
            ));
        }

        if self.sensor_id.trim().is_empty() {
            return Err(Error::lookup_table(format!(
                "Sensor ID cannot be empty for file key '{}'",
                self.file_name_key
            )));
        }

        if self.city.trim().is_empty() {
            return Err(Error::lookup_table(format!(
                "City cannot be empty for file key '{}'",
                self.file_name_key
            )));
        }

        if self.district.trim().is_empty() {
            return Err(Error::lookup_table(format!(
                "District cannot be empty for file key '{}'",
                self.file_name_key
            )));
        }

        if self.variable.trim().is_empty() {
            return Err(Error::lookup_table(format!(
                "Variable cannot be empty for file key '{}'",
                self.file_name_key
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Tank Role Enumeration
// =============================================================================

/// Tank qualifier for a sensor, parsed from the lookup table's Tank column
///
/// The table stores free text; a value containing "Yes" marks a tank
/// sensor, and the additional "in" sub-marker distinguishes inflow from
/// outflow. Any other value means the sensor does not monitor a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankRole {
    /// Sensor does not monitor a tank
    None,
    /// Sensor monitors tank inflow
    In,
    /// Sensor monitors tank outflow
    Out,
}

impl TankRole {
    /// Parse the free-text Tank column value
    ///
    /// Both markers are matched case-sensitively, exactly as the table
    /// maintainer writes them (e.g. "Yes - in", "Yes - out", "No").
    pub fn from_marker(value: &str) -> Self {
        if value.contains(TANK_MARKER) {
            if value.contains(TANK_IN_MARKER) {
                TankRole::In
            } else {
                TankRole::Out
            }
        } else {
            TankRole::None
        }
    }

    /// Get the canonical filename segment for this role, if any
    pub fn qualifier_segment(&self) -> Option<&'static str> {
        match self {
            TankRole::None => None,
            TankRole::In => Some(TANK_IN_SEGMENT),
            TankRole::Out => Some(TANK_OUT_SEGMENT),
        }
    }
}

impl std::fmt::Display for TankRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TankRole::None => write!(f, "none"),
            TankRole::In => write!(f, "in"),
            TankRole::Out => write!(f, "out"),
        }
    }
}

// =============================================================================
// Normalized Row Structure
// =============================================================================

/// One row of the canonical three-column schema
///
/// Timestamp and value coercion is permissive: unparsable fields become
/// `None` rather than failing the file ("coerce, don't crash" for
/// warehouse loads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Canonical sensor identifier
    pub sensor_id: String,

    /// Parsed observation timestamp, or `None` when coercion failed
    pub timestamp: Option<NaiveDateTime>,

    /// Measured value, or `None` when coercion failed
    pub value: Option<f64>,
}

impl NormalizedRow {
    /// Create a new normalized row
    pub fn new(sensor_id: String, timestamp: Option<NaiveDateTime>, value: Option<f64>) -> Self {
        Self {
            sensor_id,
            timestamp,
            value,
        }
    }

    /// Serialize the timestamp for canonical CSV output
    pub fn timestamp_field(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string(),
            None => String::new(),
        }
    }

    /// Serialize the value for canonical CSV output
    pub fn value_field(&self) -> String {
        match self.value {
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_record() -> SensorRecord {
        SensorRecord {
            file_name_key: "SENS1".to_string(),
            city: "Marene".to_string(),
            district: "Marconi".to_string(),
            variable: "Flow".to_string(),
            tank: TankRole::None,
            sensor_id: "S-001".to_string(),
        }
    }

    mod sensor_record_tests {
        use super::*;

        #[test]
        fn test_record_creation_valid() {
            let record = test_record();
            assert!(record.validate().is_ok());
            assert_eq!(record.sensor_id, "S-001");
        }

        #[test]
        fn test_record_required_fields() {
            let mut record = test_record();
            record.file_name_key = "".to_string();
            assert!(record.validate().is_err());

            let mut record = test_record();
            record.sensor_id = " ".to_string();
            assert!(record.validate().is_err());

            let mut record = test_record();
            record.city = "".to_string();
            assert!(record.validate().is_err());

            let mut record = test_record();
            record.variable = "".to_string();
            assert!(record.validate().is_err());
        }
    }

    mod tank_role_tests {
        use super::*;

        #[test]
        fn test_from_marker_variants() {
            assert_eq!(TankRole::from_marker("Yes - in"), TankRole::In);
            assert_eq!(TankRole::from_marker("Yes - out"), TankRole::Out);
            assert_eq!(TankRole::from_marker("Yes"), TankRole::Out);
            assert_eq!(TankRole::from_marker("No"), TankRole::None);
            assert_eq!(TankRole::from_marker(""), TankRole::None);
        }

        #[test]
        fn test_markers_are_case_sensitive() {
            // The table contract writes "Yes" with a capital Y
            assert_eq!(TankRole::from_marker("yes - in"), TankRole::None);
        }

        #[test]
        fn test_qualifier_segments() {
            assert_eq!(TankRole::None.qualifier_segment(), None);
            assert_eq!(TankRole::In.qualifier_segment(), Some("tank_in"));
            assert_eq!(TankRole::Out.qualifier_segment(), Some("tank_out"));
        }
    }

    mod normalized_row_tests {
        use super::*;

        #[test]
        fn test_field_serialization() {
            let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap();
            let row = NormalizedRow::new("S-001".to_string(), Some(ts), Some(12.5));

            assert_eq!(row.timestamp_field(), "2023-01-01 10:30:00");
            assert_eq!(row.value_field(), "12.5");
        }

        #[test]
        fn test_null_fields_serialize_empty() {
            let row = NormalizedRow::new("S-001".to_string(), None, None);
            assert_eq!(row.timestamp_field(), "");
            assert_eq!(row.value_field(), "");
        }
    }
}
