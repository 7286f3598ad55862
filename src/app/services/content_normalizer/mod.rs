//! Content normalization into the canonical three-column schema
//!
//! Two delimiter modes coexist:
//! - semicolon-delimited two-column raw files: trailing semicolons are
//!   stripped per line, then the sensor id is injected as a prepended
//!   constant column;
//! - comma-delimited files that already carry three columns: a pass-through
//!   schema rename with no sensor id injection.
//!
//! Column-count mismatches are fatal for the single file. Timestamp and
//!   value coercion is permissive: unparsable fields become null.

use crate::app::models::NormalizedRow;
use crate::constants::{
    CANONICAL_COLUMN_COUNT, DATE_FORMATS, OUTPUT_HEADER, RAW_COLUMN_COUNT, TIMESTAMP_FORMATS,
};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

#[cfg(test)]
pub mod tests;

/// Normalize a semicolon-delimited two-column raw file
///
/// The first line is treated as a header and discarded; every data line
/// becomes a row with `sensor_id` injected as the first column. `file`
/// names the input for error context only.
pub fn normalize_raw(bytes: &[u8], sensor_id: &str, file: &str) -> Result<Vec<NormalizedRow>> {
    // Some loggers terminate every line with a semicolon, which a strict
    // two-column parse would count as a third empty field
    let text = String::from_utf8_lossy(bytes);
    let cleaned: String = text
        .lines()
        .map(|line| line.trim_end_matches(';'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(cleaned.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::csv_parsing(file, "Failed to read raw file header row", Some(e)))?
        .clone();
    if headers.len() != RAW_COLUMN_COUNT {
        return Err(Error::schema(file, RAW_COLUMN_COUNT, headers.len()));
    }

    let mut rows = Vec::new();
    let mut coercion_failures = 0;

    for result in reader.records() {
        let record =
            result.map_err(|e| Error::csv_parsing(file, "Failed to read raw record", Some(e)))?;
        if record.len() != RAW_COLUMN_COUNT {
            return Err(Error::schema(file, RAW_COLUMN_COUNT, record.len()));
        }

        let timestamp = coerce_timestamp(record.get(0).unwrap_or(""));
        let value = coerce_value(record.get(1).unwrap_or(""));
        if timestamp.is_none() {
            coercion_failures += 1;
        }

        rows.push(NormalizedRow::new(sensor_id.to_string(), timestamp, value));
    }

    if coercion_failures > 0 {
        warn!(
            "{} of {} timestamps in '{}' could not be parsed and were set to null",
            coercion_failures,
            rows.len(),
            file
        );
    }
    debug!("Normalized {} raw rows from '{}'", rows.len(), file);

    Ok(rows)
}

/// Normalize a comma-delimited file that already carries three columns
///
/// The sensor id is assumed embedded in the first column of every row; no
/// injection happens. The header row is replaced by the canonical one on
/// output, whatever names it carried.
pub fn normalize_canonical(bytes: &[u8], file: &str) -> Result<Vec<NormalizedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| Error::csv_parsing(file, "Failed to read canonical header row", Some(e)))?
        .clone();
    if headers.len() != CANONICAL_COLUMN_COUNT {
        return Err(Error::schema(file, CANONICAL_COLUMN_COUNT, headers.len()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| Error::csv_parsing(file, "Failed to read canonical record", Some(e)))?;
        if record.len() != CANONICAL_COLUMN_COUNT {
            return Err(Error::schema(file, CANONICAL_COLUMN_COUNT, record.len()));
        }

        rows.push(NormalizedRow::new(
            record.get(0).unwrap_or("").trim().to_string(),
            coerce_timestamp(record.get(1).unwrap_or("")),
            coerce_value(record.get(2).unwrap_or("")),
        ));
    }

    debug!("Normalized {} canonical rows from '{}'", rows.len(), file);
    Ok(rows)
}

/// Serialize normalized rows as canonical CSV bytes
///
/// Output is UTF-8, comma-delimited, with the fixed header row
/// `Sensor ID,Timestamp,Value`. Null fields serialize as empty cells.
pub fn to_csv_bytes(rows: &[NormalizedRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| Error::csv_parsing("output", "Failed to write header row", Some(e)))?;

    for row in rows {
        writer
            .write_record([
                row.sensor_id.as_str(),
                row.timestamp_field().as_str(),
                row.value_field().as_str(),
            ])
            .map_err(|e| Error::csv_parsing("output", "Failed to write row", Some(e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::csv_parsing("output", format!("Failed to flush output: {e}"), None))
}

/// Coerce a timestamp string, returning `None` on failure
///
/// Tries the known datetime formats first, then date-only formats with
/// midnight assumed. Failure is a non-fatal coercion warning by policy.
pub fn coerce_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Coerce a value string, returning `None` on failure
///
/// Accepts a decimal comma as well as a decimal point; some field loggers
/// export values in the regional format.
pub fn coerce_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.parse::<f64>()
        .or_else(|_| raw.replace(',', ".").parse::<f64>())
        .ok()
}
