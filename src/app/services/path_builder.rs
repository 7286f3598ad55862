//! Canonical destination path construction
//!
//! Given a resolved sensor identity and a time range, computes the
//! deterministic destination key. Folder segments are lower-cased while
//! filename segments keep the table-provided casing; that inconsistency is
//! observed production behavior and is preserved, not corrected.
//!
//! There is no collision detection: two raw files mapping to the same
//! canonical key overwrite each other at the storage layer. Determinism
//! also means re-running the same input rewrites the same key, which is
//! the idempotence the at-least-once trigger layer relies on.

use crate::app::models::SensorRecord;
use crate::constants::CSV_EXTENSION;

/// Build the canonical file name for a resolved identity and time range
///
/// Format: `{City}_{District}[_{tank_in|tank_out}]_{Variable}_{start}_{end}.csv`,
/// with casing exactly as stored in the lookup table.
pub fn build_file_name(record: &SensorRecord, start: &str, end: &str) -> String {
    match record.tank.qualifier_segment() {
        Some(qualifier) => format!(
            "{}_{}_{}_{}_{}_{}.{}",
            record.city, record.district, qualifier, record.variable, start, end, CSV_EXTENSION
        ),
        None => format!(
            "{}_{}_{}_{}_{}.{}",
            record.city, record.district, record.variable, start, end, CSV_EXTENSION
        ),
    }
}

/// Build the canonical folder prefix for a resolved identity
///
/// Format: `{city}/{district}/{variable}/`, all lower-cased.
pub fn build_folder(record: &SensorRecord) -> String {
    format!(
        "{}/{}/{}/",
        record.city.to_lowercase(),
        record.district.to_lowercase(),
        record.variable.to_lowercase()
    )
}

/// Build the full canonical destination key
pub fn build_canonical_key(record: &SensorRecord, start: &str, end: &str) -> String {
    format!(
        "{}{}",
        build_folder(record),
        build_file_name(record, start, end)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::TankRole;

    fn record(tank: TankRole) -> SensorRecord {
        SensorRecord {
            file_name_key: "SENS1".to_string(),
            city: "Marene".to_string(),
            district: "Marconi".to_string(),
            variable: "Flow".to_string(),
            tank,
            sensor_id: "S-001".to_string(),
        }
    }

    #[test]
    fn test_key_without_tank_qualifier() {
        let key = build_canonical_key(&record(TankRole::None), "20230101", "20230201");
        assert_eq!(
            key,
            "marene/marconi/flow/Marene_Marconi_Flow_20230101_20230201.csv"
        );
    }

    #[test]
    fn test_key_with_tank_in_qualifier() {
        let key = build_canonical_key(&record(TankRole::In), "20230101", "20230201");
        assert!(key.contains("tank_in"));
        assert_eq!(
            key,
            "marene/marconi/flow/Marene_Marconi_tank_in_Flow_20230101_20230201.csv"
        );
    }

    #[test]
    fn test_key_with_tank_out_qualifier() {
        let key = build_canonical_key(&record(TankRole::Out), "20230101", "20230201");
        assert!(key.contains("tank_out"));
        assert!(!key.contains("tank_in_"));
    }

    #[test]
    fn test_folder_segments_are_lowercased() {
        let folder = build_folder(&record(TankRole::None));
        assert_eq!(folder, "marene/marconi/flow/");
    }

    #[test]
    fn test_file_name_keeps_table_casing() {
        let name = build_file_name(&record(TankRole::None), "20230101", "20230201");
        assert_eq!(name, "Marene_Marconi_Flow_20230101_20230201.csv");
    }

    #[test]
    fn test_key_is_deterministic() {
        let record = record(TankRole::In);
        let first = build_canonical_key(&record, "20230101", "20230201");
        let second = build_canonical_key(&record, "20230101", "20230201");
        assert_eq!(first, second);
    }

    #[test]
    fn test_degraded_range_repeats_token() {
        let key = build_canonical_key(&record(TankRole::None), "20230101", "20230101");
        assert!(key.ends_with("Marene_Marconi_Flow_20230101_20230101.csv"));
    }
}
