//! Command-line argument definitions for the sensor router
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::constants::{
    DEFAULT_CONFIG_BUCKET, DEFAULT_DATA_BUCKET, DEFAULT_DATASET, DEFAULT_LOOKUP_TABLE_KEY,
    DEFAULT_PARALLEL_WORKERS,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the sensor data router
///
/// Routes raw water-network telemetry files to their canonical object-store
/// locations and bulk-loads canonical files into the warehouse sink.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sensor-router",
    version,
    about = "Route and normalize water-network sensor telemetry files",
    long_about = "Routes semi-structured sensor telemetry files to deterministic canonical \
                  object-store locations, rewriting their content into the three-column \
                  {Sensor ID, Timestamp, Value} schema, and bulk-loads canonical files into \
                  per-variable warehouse tables. Sensor identities come from a mutable lookup \
                  table fetched fresh for every file."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the sensor router
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Route raw files to their canonical destinations (main command)
    Route(RouteArgs),
    /// Load canonical files into the warehouse sink
    Load(LoadArgs),
    /// Report on the lookup table contents
    Lookup(LookupArgs),
}

/// Arguments for the route command (raw-file routing)
#[derive(Debug, Clone, Parser)]
pub struct RouteArgs {
    /// Root directory of the local object store
    ///
    /// Buckets are top-level directories under this root; object keys map
    /// to file paths below each bucket.
    #[arg(
        short = 's',
        long = "store-root",
        value_name = "PATH",
        default_value = ".",
        help = "Root directory of the local object store"
    )]
    pub store_root: PathBuf,

    /// Bucket holding the incoming raw files
    #[arg(
        short = 'b',
        long = "bucket",
        value_name = "NAME",
        default_value = DEFAULT_DATA_BUCKET,
        help = "Bucket holding the incoming raw files"
    )]
    pub bucket: String,

    /// Object key of a single raw file to route
    #[arg(
        short = 'k',
        long = "key",
        value_name = "KEY",
        help = "Object key of a single raw file to route"
    )]
    pub key: Option<String>,

    /// Path to a JSON trigger event payload
    ///
    /// Accepts both the full notification envelope and the legacy
    /// {bucket, name} shape.
    #[arg(
        short = 'e',
        long = "event-file",
        value_name = "FILE",
        help = "Path to a JSON trigger event payload",
        conflicts_with = "key"
    )]
    pub event_file: Option<PathBuf>,

    /// Key prefix for batch replay
    ///
    /// Every `.csv` object under the prefix is routed; failed files are
    /// logged and skipped, never batch-fatal.
    #[arg(
        short = 'p',
        long = "prefix",
        value_name = "PREFIX",
        help = "Replay every raw CSV under this key prefix",
        conflicts_with_all = ["key", "event_file"]
    )]
    pub prefix: Option<String>,

    /// Bucket holding the lookup table
    #[arg(
        long = "config-bucket",
        value_name = "NAME",
        default_value = DEFAULT_CONFIG_BUCKET,
        help = "Bucket holding the lookup table"
    )]
    pub config_bucket: String,

    /// Object key of the lookup table
    #[arg(
        long = "lookup-table",
        value_name = "KEY",
        default_value = DEFAULT_LOOKUP_TABLE_KEY,
        help = "Object key of the lookup table"
    )]
    pub lookup_table_key: String,

    /// Destination bucket for canonical files
    #[arg(
        long = "data-bucket",
        value_name = "NAME",
        default_value = DEFAULT_DATA_BUCKET,
        help = "Destination bucket for canonical files"
    )]
    pub data_bucket: String,

    /// Number of parallel workers for batch replay
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = DEFAULT_PARALLEL_WORKERS,
        help = "Number of parallel workers for batch replay"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the load command (warehouse bulk loading)
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Root directory of the local object store
    #[arg(
        short = 's',
        long = "store-root",
        value_name = "PATH",
        default_value = ".",
        help = "Root directory of the local object store"
    )]
    pub store_root: PathBuf,

    /// Bucket holding the canonical files
    #[arg(
        short = 'b',
        long = "bucket",
        value_name = "NAME",
        default_value = DEFAULT_DATA_BUCKET,
        help = "Bucket holding the canonical files"
    )]
    pub bucket: String,

    /// Object key of a single canonical file to load
    #[arg(
        short = 'k',
        long = "key",
        value_name = "KEY",
        help = "Object key of a single canonical file to load"
    )]
    pub key: Option<String>,

    /// Path to a JSON trigger event payload
    #[arg(
        short = 'e',
        long = "event-file",
        value_name = "FILE",
        help = "Path to a JSON trigger event payload",
        conflicts_with = "key"
    )]
    pub event_file: Option<PathBuf>,

    /// Key prefix for batch replay
    #[arg(
        short = 'p',
        long = "prefix",
        value_name = "PREFIX",
        help = "Load every canonical CSV under this key prefix",
        conflicts_with_all = ["key", "event_file"]
    )]
    pub prefix: Option<String>,

    /// Directory the warehouse sink writes its tables to
    #[arg(
        long = "sink-root",
        value_name = "PATH",
        default_value = "./warehouse",
        help = "Directory the warehouse sink writes its tables to"
    )]
    pub sink_root: PathBuf,

    /// Warehouse dataset; table ids are <dataset>.<variable>
    #[arg(
        short = 'd',
        long = "dataset",
        value_name = "NAME",
        default_value = DEFAULT_DATASET,
        help = "Warehouse dataset name"
    )]
    pub dataset: String,

    /// Number of parallel workers for batch replay
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = DEFAULT_PARALLEL_WORKERS,
        help = "Number of parallel workers for batch replay"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the lookup command (lookup table reports)
#[derive(Debug, Clone, Parser)]
pub struct LookupArgs {
    /// Root directory of the local object store
    #[arg(
        short = 's',
        long = "store-root",
        value_name = "PATH",
        default_value = ".",
        help = "Root directory of the local object store"
    )]
    pub store_root: PathBuf,

    /// Bucket holding the lookup table
    #[arg(
        long = "config-bucket",
        value_name = "NAME",
        default_value = DEFAULT_CONFIG_BUCKET,
        help = "Bucket holding the lookup table"
    )]
    pub config_bucket: String,

    /// Object key of the lookup table
    #[arg(
        long = "lookup-table",
        value_name = "KEY",
        default_value = DEFAULT_LOOKUP_TABLE_KEY,
        help = "Object key of the lookup table"
    )]
    pub lookup_table_key: String,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the report"
    )]
    pub output_format: OutputFormat,

    /// Include the full record listing
    ///
    /// By default, shows summary statistics only.
    #[arg(long = "detailed", help = "Include the full record listing")]
    pub detailed: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

fn validate_store_root(store_root: &PathBuf) -> Result<()> {
    if !store_root.exists() {
        return Err(Error::configuration(format!(
            "Store root does not exist: {}",
            store_root.display()
        )));
    }
    if !store_root.is_dir() {
        return Err(Error::configuration(format!(
            "Store root is not a directory: {}",
            store_root.display()
        )));
    }
    Ok(())
}

fn validate_target(
    key: &Option<String>,
    event_file: &Option<PathBuf>,
    prefix: &Option<String>,
) -> Result<()> {
    if key.is_none() && event_file.is_none() && prefix.is_none() {
        return Err(Error::configuration(
            "One of --key, --event-file, or --prefix is required",
        ));
    }
    if let Some(event_file) = event_file {
        if !event_file.exists() {
            return Err(Error::configuration(format!(
                "Event file does not exist: {}",
                event_file.display()
            )));
        }
    }
    Ok(())
}

impl RouteArgs {
    /// Validate the route command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_store_root(&self.store_root)?;
        validate_target(&self.key, &self.event_file, &self.prefix)?;

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }
        if self.workers > 100 {
            return Err(Error::configuration("Number of workers cannot exceed 100"));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl LoadArgs {
    /// Validate the load command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_store_root(&self.store_root)?;
        validate_target(&self.key, &self.event_file, &self.prefix)?;

        if self.dataset.trim().is_empty() {
            return Err(Error::configuration("Dataset cannot be empty"));
        }
        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }
        if self.workers > 100 {
            return Err(Error::configuration("Number of workers cannot exceed 100"));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl LookupArgs {
    /// Validate the lookup command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_store_root(&self.store_root)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
