//! Tests for the lookup resolver service

pub mod resolver_tests;

use crate::app::models::{SensorRecord, TankRole};

/// Build a record for resolver tests
pub fn record(key: &str, sensor_id: &str) -> SensorRecord {
    SensorRecord {
        file_name_key: key.to_string(),
        city: "Marene".to_string(),
        district: "Marconi".to_string(),
        variable: "Flow".to_string(),
        tank: TankRole::None,
        sensor_id: sensor_id.to_string(),
    }
}
