//! Lookup command implementation
//!
//! Reports on the lookup table: record counts by city and variable, tank
//! sensors, and rows skipped during loading. Useful for checking a table
//! edit before the next file arrives.

use crate::app::adapters::object_store::{LocalStore, ObjectStore};
use crate::app::models::TankRole;
use crate::app::pipeline::RouterStats;
use crate::app::services::lookup_resolver::LookupTable;
use crate::cli::args::{LookupArgs, OutputFormat};
use crate::cli::commands::shared;
use crate::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of the lookup table contents
#[derive(Debug, Serialize)]
pub struct LookupReport {
    pub source: String,
    pub total_records: usize,
    pub rows_skipped: usize,
    pub tank_sensors: usize,
    pub by_city: BTreeMap<String, usize>,
    pub by_variable: BTreeMap<String, usize>,
}

impl LookupReport {
    /// Build a report from a loaded table
    pub fn from_table(table: &LookupTable) -> Self {
        let mut by_city = BTreeMap::new();
        let mut by_variable = BTreeMap::new();
        let mut tank_sensors = 0;

        for record in table.records() {
            *by_city.entry(record.city.clone()).or_insert(0) += 1;
            *by_variable.entry(record.variable.clone()).or_insert(0) += 1;
            if record.tank != TankRole::None {
                tank_sensors += 1;
            }
        }

        Self {
            source: table.source().to_string(),
            total_records: table.len(),
            rows_skipped: table.rows_skipped(),
            tank_sensors,
            by_city,
            by_variable,
        }
    }
}

/// Execute the lookup command
pub async fn run_lookup(args: LookupArgs) -> Result<RouterStats> {
    args.validate()?;
    shared::setup_logging(args.get_log_level(), false)?;

    let store = LocalStore::new(&args.store_root);
    let bytes = store
        .get(&args.config_bucket, &args.lookup_table_key)
        .await?;
    let source = format!("{}/{}", args.config_bucket, args.lookup_table_key);
    let table = LookupTable::from_csv_bytes(&bytes, &source)?;

    let report = LookupReport::from_table(&table);
    match args.output_format {
        OutputFormat::Json => print_json_report(&report, args.detailed, &table)?,
        OutputFormat::Human => print_human_report(&report, args.detailed, &table),
    }

    Ok(RouterStats::default())
}

fn print_json_report(report: &LookupReport, detailed: bool, table: &LookupTable) -> Result<()> {
    let json = if detailed {
        #[derive(Serialize)]
        struct DetailedReport<'a> {
            #[serde(flatten)]
            report: &'a LookupReport,
            records: &'a [crate::app::models::SensorRecord],
        }
        serde_json::to_string_pretty(&DetailedReport {
            report,
            records: table.records(),
        })
    } else {
        serde_json::to_string_pretty(report)
    }
    .map_err(|e| crate::Error::configuration(format!("Failed to serialize report: {e}")))?;

    println!("{json}");
    Ok(())
}

fn print_human_report(report: &LookupReport, detailed: bool, table: &LookupTable) {
    println!("{}", "Lookup Table Report".green().bold());
    println!("===================");
    println!("Source:        {}", report.source);
    println!("Records:       {}", report.total_records);
    if report.rows_skipped > 0 {
        println!(
            "Rows skipped:  {}",
            report.rows_skipped.to_string().yellow().bold()
        );
    } else {
        println!("Rows skipped:  0");
    }
    println!("Tank sensors:  {}", report.tank_sensors);

    println!();
    println!("{}", "By city:".bold());
    for (city, count) in &report.by_city {
        println!("  {city:<20} {count}");
    }

    println!();
    println!("{}", "By variable:".bold());
    for (variable, count) in &report.by_variable {
        println!("  {variable:<20} {count}");
    }

    if detailed {
        println!();
        println!("{}", "Records:".bold());
        for record in table.records() {
            println!(
                "  {:<24} {} / {} / {} (tank: {}) -> {}",
                record.file_name_key,
                record.city,
                record.district,
                record.variable,
                record.tank,
                record.sensor_id.cyan()
            );
        }
    }
}
