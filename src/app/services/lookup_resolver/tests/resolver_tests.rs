//! Tests for the two filename resolution strategies

use super::record;
use crate::Error;
use crate::app::services::lookup_resolver::{LookupTable, MatchStrategy};

#[test]
fn test_contains_matches_longer_file_name() {
    // File naming may carry a longer key than the table entry
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    let resolved = table
        .resolve("SENS1_EXTRA_20230101_20230201.csv", MatchStrategy::Contains)
        .unwrap();
    assert_eq!(resolved.sensor_id, "S-001");
}

#[test]
fn test_contains_takes_first_match_in_table_order() {
    let table = LookupTable::from_records(
        vec![record("SENS", "S-FIRST"), record("SENS1", "S-SECOND")],
        "test",
    );

    // Both keys are contained in the stem; table order decides
    let resolved = table
        .resolve("SENS1_20230101_20230201.csv", MatchStrategy::Contains)
        .unwrap();
    assert_eq!(resolved.sensor_id, "S-FIRST");
}

#[test]
fn test_contains_is_deterministic_across_calls() {
    let table = LookupTable::from_records(
        vec![record("SENS", "S-FIRST"), record("SENS1", "S-SECOND")],
        "test",
    );

    for _ in 0..3 {
        let resolved = table
            .resolve("SENS1_20230101_20230201.csv", MatchStrategy::Contains)
            .unwrap();
        assert_eq!(resolved.sensor_id, "S-FIRST");
    }
}

#[test]
fn test_exact_after_strip_matches_two_part_suffix() {
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    let resolved = table
        .resolve("SENS1_20230101_20230201.csv", MatchStrategy::ExactAfterStrip)
        .unwrap();
    assert_eq!(resolved.sensor_id, "S-001");
}

#[test]
fn test_exact_after_strip_handles_multi_token_keys() {
    let table = LookupTable::from_records(vec![record("VIA_ROMA_12", "S-009")], "test");

    let resolved = table
        .resolve(
            "VIA_ROMA_12_20230101_20230201.csv",
            MatchStrategy::ExactAfterStrip,
        )
        .unwrap();
    assert_eq!(resolved.sensor_id, "S-009");
}

#[test]
fn test_exact_after_strip_rejects_partial_key() {
    // "SENS1_EXTRA" does not equal "SENS1" after stripping the suffix
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    let result = table.resolve(
        "SENS1_EXTRA_20230101_20230201.csv",
        MatchStrategy::ExactAfterStrip,
    );
    assert!(matches!(result, Err(Error::LookupNotFound { .. })));
}

#[test]
fn test_strategies_are_independent_code_paths() {
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    // Contains accepts the longer name, ExactAfterStrip does not
    let name = "SENS1_EXTRA_20230101_20230201.csv";
    assert!(table.resolve(name, MatchStrategy::Contains).is_ok());
    assert!(table.resolve(name, MatchStrategy::ExactAfterStrip).is_err());
}

#[test]
fn test_unresolvable_name_is_not_found() {
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    let result = table.resolve("UNKNOWN_20230101_20230201.csv", MatchStrategy::Contains);
    match result {
        Err(Error::LookupNotFound { file_key }) => {
            assert_eq!(file_key, "UNKNOWN_20230101_20230201.csv");
        }
        other => panic!("Expected LookupNotFound, got {other:?}"),
    }
}

#[test]
fn test_resolution_uses_final_path_segment() {
    let table = LookupTable::from_records(vec![record("SENS1", "S-001")], "test");

    let resolved = table
        .resolve(
            "incoming/raw/SENS1_20230101_20230201.csv",
            MatchStrategy::ExactAfterStrip,
        )
        .unwrap();
    assert_eq!(resolved.sensor_id, "S-001");
}

#[test]
fn test_empty_table_never_resolves() {
    let table = LookupTable::from_records(vec![], "test");
    assert!(
        table
            .resolve("SENS1_20230101_20230201.csv", MatchStrategy::Contains)
            .is_err()
    );
}
