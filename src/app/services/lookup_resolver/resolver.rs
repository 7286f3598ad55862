//! Filename resolution against the lookup table
//!
//! Two strategies coexist because two filename conventions exist in
//! production: lenient substring containment, and exact match after
//! stripping the trailing two timestamp tokens. They are separate code
//! paths selected by the caller, never silently merged.

use super::{LookupTable, MatchStrategy};
use crate::app::models::SensorRecord;
use crate::app::services::filename_parser::{file_name_of, strip_extension};
use crate::{Error, Result};
use tracing::debug;

impl LookupTable {
    /// Resolve a filename to its canonical sensor identity
    ///
    /// The extension is stripped before matching. Records are scanned in
    /// table order and the first match wins, so ambiguous keys resolve
    /// deterministically.
    ///
    /// # Errors
    /// * `Error::LookupNotFound` when no record matches; this is per-file
    ///   and must not be treated as fatal to a batch
    pub fn resolve(&self, file_key: &str, strategy: MatchStrategy) -> Result<&SensorRecord> {
        let stem = strip_extension(file_name_of(file_key));

        let matched = match strategy {
            MatchStrategy::Contains => self
                .records
                .iter()
                .find(|record| stem.contains(&record.file_name_key)),
            MatchStrategy::ExactAfterStrip => {
                let base = strip_trailing_tokens(stem, 2);
                self.records
                    .iter()
                    .find(|record| record.file_name_key == base)
            }
        };

        match matched {
            Some(record) => {
                debug!(
                    "Resolved '{}' to sensor '{}' via {:?}",
                    file_key, record.sensor_id, strategy
                );
                Ok(record)
            }
            None => Err(Error::lookup_not_found(file_key)),
        }
    }
}

/// Remove the last `count` underscore-delimited tokens from a stem
///
/// Returns an empty string when the stem has no tokens left, which can
/// never equal a valid (non-empty) file name key.
fn strip_trailing_tokens(stem: &str, count: usize) -> String {
    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() <= count {
        return String::new();
    }
    tokens[..tokens.len() - count].join("_")
}

#[cfg(test)]
mod strip_tests {
    use super::strip_trailing_tokens;

    #[test]
    fn test_strip_trailing_tokens() {
        assert_eq!(strip_trailing_tokens("A_B_20230101_20230201", 2), "A_B");
        assert_eq!(strip_trailing_tokens("A_20230101_20230201", 2), "A");
        assert_eq!(strip_trailing_tokens("A_20230101", 2), "");
        assert_eq!(strip_trailing_tokens("A", 2), "");
    }
}
