//! Lookup table loading from CSV bytes
//!
//! The table arrives as CSV with the contractual header names
//! `File Name, City, District, Variable, Tank, Sensor ID`. Header names are
//! an external contract with the table maintainer; a missing column fails
//! the load, while individual blank rows are skipped with a warning.

use super::LookupTable;
use crate::app::models::{SensorRecord, TankRole};
use crate::constants::lookup_columns;
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

impl LookupTable {
    /// Load the lookup table from CSV bytes
    ///
    /// `source` identifies where the bytes came from (bucket/key or path)
    /// and is used only for log context.
    ///
    /// # Errors
    /// * `Error::LookupTable` when a contractual column header is missing
    /// * `Error::CsvParsing` when the CSV itself cannot be read
    pub fn from_csv_bytes(bytes: &[u8], source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| {
                Error::csv_parsing(source, "Failed to read lookup table header row", Some(e))
            })?
            .clone();

        // Map contractual column names to positions; names must match exactly
        let mut column_index: HashMap<&str, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            column_index.insert(header.trim(), i);
        }

        let missing: Vec<&str> = lookup_columns::REQUIRED
            .iter()
            .filter(|name| !column_index.contains_key(**name))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(Error::lookup_table(format!(
                "Lookup table at '{}' is missing required column(s): {}",
                source,
                missing.join(", ")
            )));
        }

        let field = |record: &csv::StringRecord, name: &str| -> String {
            column_index
                .get(name)
                .and_then(|&i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };

        let mut records = Vec::new();
        let mut rows_skipped = 0;

        for (row_number, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::csv_parsing(source, "Failed to read lookup table record", Some(e))
            })?;

            let sensor_record = SensorRecord::new(
                field(&record, lookup_columns::FILE_NAME),
                field(&record, lookup_columns::CITY),
                field(&record, lookup_columns::DISTRICT),
                field(&record, lookup_columns::VARIABLE),
                TankRole::from_marker(&field(&record, lookup_columns::TANK)),
                field(&record, lookup_columns::SENSOR_ID),
            );

            match sensor_record {
                Ok(sensor_record) => records.push(sensor_record),
                Err(e) => {
                    // Bad rows are skipped, not fatal: the rest of the table
                    // must stay usable for other files
                    warn!(
                        "Skipping lookup table row {} in '{}': {}",
                        row_number + 2,
                        source,
                        e
                    );
                    rows_skipped += 1;
                }
            }
        }

        if records.is_empty() {
            warn!("Lookup table at '{}' contains no usable records", source);
        } else {
            info!(
                "Lookup table loaded from '{}': {} records ({} skipped)",
                source,
                records.len(),
                rows_skipped
            );
        }
        debug!(
            "Lookup table keys: {:?}",
            records
                .iter()
                .map(|r| r.file_name_key.as_str())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            records,
            source: source.to_string(),
            rows_skipped,
        })
    }
}
