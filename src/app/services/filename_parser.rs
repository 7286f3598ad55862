//! Filename and path convention parsing
//!
//! Raw files arrive as `.../<key>_<start>_<end>.csv`, or in the degraded
//! form `.../<key>_<single-timestamp>.csv`. Canonical files live under a
//! `<city>/<district>/<variable>/` folder structure. This module decomposes
//! both conventions into structured values, independent of the lookup table.
//!
//! Every structural shortfall is an explicit `MalformedPath` error; token
//! arrays are never indexed without first checking their length.

use crate::{Error, Result};

/// Components of a raw underscore-encoded filename
///
/// `base_key` is the portion matched against the lookup table;
/// `start`/`end` are the trailing timestamp tokens. In the degraded
/// single-timestamp case both carry the same token and `degraded` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileName {
    /// Filename with the trailing timestamp tokens and extension removed
    pub base_key: String,

    /// Start-of-range timestamp token
    pub start: String,

    /// End-of-range timestamp token
    pub end: String,

    /// True when the filename carried a single timestamp token
    pub degraded: bool,
}

/// Components of a canonical folder-structured path
///
/// Canonical paths follow `<city>/<district>/<sensor_type>/<file_name>`
/// where the file name is underscore-encoded as
/// `<location>_<start_date>_<end_date>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    pub city: String,
    pub district: String,
    pub sensor_type: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

/// Strip a trailing `.<ext>` from a file name, if present
///
/// Only the final extension is removed; dots inside the stem survive.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Extract the file name (final segment) from an object key
pub fn file_name_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Check whether an underscore token looks like a timestamp token
///
/// Time tokens in the raw naming convention are runs of ASCII digits
/// (e.g. `20230101` or `202301011200`).
fn is_time_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a raw underscore-encoded file name
///
/// Strips the extension, splits on `_`, and takes up to two trailing
/// timestamp tokens. A single trailing token is the degraded case and is
/// used as both `start` and `end`; zero timestamp tokens or an empty base
/// key make the file unprocessable.
pub fn parse_raw_file_name(key: &str) -> Result<RawFileName> {
    let file_name = file_name_of(key);
    let stem = strip_extension(file_name);

    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() < 2 {
        return Err(Error::malformed_path(
            key,
            "expected at least one '_'-delimited timestamp token",
        ));
    }

    let last = tokens[tokens.len() - 1];
    if !is_time_token(last) {
        return Err(Error::malformed_path(
            key,
            format!("trailing token '{last}' is not a timestamp"),
        ));
    }

    let second_last = tokens[tokens.len() - 2];
    let (base_tokens, start, end, degraded) = if tokens.len() >= 3 && is_time_token(second_last) {
        (&tokens[..tokens.len() - 2], second_last, last, false)
    } else {
        (&tokens[..tokens.len() - 1], last, last, true)
    };

    let base_key = base_tokens.join("_");
    if base_key.is_empty() {
        return Err(Error::malformed_path(
            key,
            "no base key before the timestamp tokens",
        ));
    }

    Ok(RawFileName {
        base_key,
        start: start.to_string(),
        end: end.to_string(),
        degraded,
    })
}

/// Parse a canonical folder-structured path
///
/// The first three `/`-segments are city, district, and sensor type; the
/// final segment is the file name, whose underscore tokens split into
/// `location` (all but the last two, rejoined with `_`), `start_date`, and
/// `end_date` (extension stripped).
pub fn parse_canonical_path(path: &str) -> Result<CanonicalPath> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 4 {
        return Err(Error::malformed_path(
            path,
            format!(
                "expected at least 4 '/'-segments (city/district/type/file), found {}",
                segments.len()
            ),
        ));
    }

    let file_name = segments[segments.len() - 1];
    let tokens: Vec<&str> = file_name.split('_').collect();
    if tokens.len() < 3 {
        return Err(Error::malformed_path(
            path,
            format!(
                "expected at least 3 '_'-tokens in file name '{file_name}', found {}",
                tokens.len()
            ),
        ));
    }

    let location = tokens[..tokens.len() - 2].join("_");
    let start_date = tokens[tokens.len() - 2].to_string();
    let end_date = strip_extension(tokens[tokens.len() - 1]).to_string();

    Ok(CanonicalPath {
        city: segments[0].to_string(),
        district: segments[1].to_string(),
        sensor_type: segments[2].to_string(),
        location,
        start_date,
        end_date,
    })
}

/// Extract the lower-cased variable folder segment from a canonical key
///
/// The variable is the segment immediately containing the file, i.e. the
/// second-to-last `/`-segment. Used by the warehouse-load flow to derive
/// the destination table id.
pub fn variable_from_path(path: &str) -> Result<String> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 2 {
        return Err(Error::malformed_path(
            path,
            "expected a variable folder segment before the file name",
        ));
    }

    let variable = segments[segments.len() - 2];
    if variable.is_empty() {
        return Err(Error::malformed_path(path, "variable folder segment is empty"));
    }

    Ok(variable.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod raw_file_name_tests {
        use super::*;

        #[test]
        fn test_two_timestamp_tokens() {
            let parsed = parse_raw_file_name("SENS1_20230101_20230201.csv").unwrap();
            assert_eq!(parsed.base_key, "SENS1");
            assert_eq!(parsed.start, "20230101");
            assert_eq!(parsed.end, "20230201");
            assert!(!parsed.degraded);
        }

        #[test]
        fn test_multi_token_base_key() {
            let parsed = parse_raw_file_name("VIA_ROMA_12_20230101_20230201.csv").unwrap();
            assert_eq!(parsed.base_key, "VIA_ROMA_12");
            assert_eq!(parsed.start, "20230101");
            assert_eq!(parsed.end, "20230201");
        }

        #[test]
        fn test_degraded_single_timestamp() {
            let parsed = parse_raw_file_name("STATION_20230101.csv").unwrap();
            assert_eq!(parsed.base_key, "STATION");
            assert_eq!(parsed.start, "20230101");
            assert_eq!(parsed.end, "20230101");
            assert!(parsed.degraded);
        }

        #[test]
        fn test_key_with_folders() {
            let parsed = parse_raw_file_name("incoming/raw/SENS1_20230101_20230201.csv").unwrap();
            assert_eq!(parsed.base_key, "SENS1");
        }

        #[test]
        fn test_no_timestamp_tokens_is_malformed() {
            let result = parse_raw_file_name("SENSOR_NOTES.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }

        #[test]
        fn test_no_underscores_is_malformed() {
            let result = parse_raw_file_name("readme.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }

        #[test]
        fn test_timestamps_without_base_key_is_malformed() {
            let result = parse_raw_file_name("20230101_20230201.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }
    }

    mod canonical_path_tests {
        use super::*;

        #[test]
        fn test_well_formed_path() {
            let parsed =
                parse_canonical_path("marene/marconi/flow/SENS1_20230101_20230201.csv").unwrap();
            assert_eq!(parsed.city, "marene");
            assert_eq!(parsed.district, "marconi");
            assert_eq!(parsed.sensor_type, "flow");
            assert_eq!(parsed.location, "SENS1");
            assert_eq!(parsed.start_date, "20230101");
            assert_eq!(parsed.end_date, "20230201");
        }

        #[test]
        fn test_multi_token_location() {
            let parsed =
                parse_canonical_path("marene/marconi/flow/VIA_ROMA_12_20230101_20230201.csv")
                    .unwrap();
            assert_eq!(parsed.location, "VIA_ROMA_12");
        }

        #[test]
        fn test_too_few_path_segments_is_malformed() {
            let result = parse_canonical_path("marene/SENS1_20230101_20230201.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }

        #[test]
        fn test_too_few_file_tokens_is_malformed() {
            let result = parse_canonical_path("marene/marconi/flow/SENS1.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }
    }

    mod variable_tests {
        use super::*;

        #[test]
        fn test_variable_is_second_to_last_segment_lowercased() {
            let variable =
                variable_from_path("marene/marconi/Flow/Marene_Marconi_Flow_20230101_20230201.csv")
                    .unwrap();
            assert_eq!(variable, "flow");
        }

        #[test]
        fn test_bare_file_name_is_malformed() {
            let result = variable_from_path("file.csv");
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }
    }

    mod helper_tests {
        use super::*;

        #[test]
        fn test_strip_extension() {
            assert_eq!(strip_extension("file.csv"), "file");
            assert_eq!(strip_extension("file"), "file");
            assert_eq!(strip_extension("archive.2023.csv"), "archive.2023");
        }

        #[test]
        fn test_file_name_of() {
            assert_eq!(file_name_of("a/b/c.csv"), "c.csv");
            assert_eq!(file_name_of("c.csv"), "c.csv");
        }
    }
}
