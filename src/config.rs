//! Configuration management and validation.
//!
//! Provides the router configuration: bucket names, the lookup table
//! location, the warehouse dataset, and batch replay settings.

use crate::constants::{
    DEFAULT_CONFIG_BUCKET, DEFAULT_DATA_BUCKET, DEFAULT_DATASET, DEFAULT_LOOKUP_TABLE_KEY,
    DEFAULT_PARALLEL_WORKERS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Global configuration for the sensor router
///
/// The lookup table is always fetched fresh from
/// `{config_bucket}/{lookup_table_key}` for each incoming file, so table
/// edits take effect on the next file without redeployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Bucket holding configuration artifacts (the lookup table)
    pub config_bucket: String,

    /// Object key of the lookup table within the config bucket
    pub lookup_table_key: String,

    /// Destination bucket for canonical sensor data
    pub data_bucket: String,

    /// Warehouse dataset; table ids are derived as `<dataset>.<variable>`
    pub dataset: String,

    /// Number of concurrent file invocations during batch replay
    pub workers: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            config_bucket: DEFAULT_CONFIG_BUCKET.to_string(),
            lookup_table_key: DEFAULT_LOOKUP_TABLE_KEY.to_string(),
            data_bucket: DEFAULT_DATA_BUCKET.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            workers: DEFAULT_PARALLEL_WORKERS,
        }
    }
}

impl RouterConfig {
    /// Create configuration with a custom config bucket
    pub fn with_config_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config_bucket = bucket.into();
        self
    }

    /// Create configuration with a custom lookup table key
    pub fn with_lookup_table_key(mut self, key: impl Into<String>) -> Self {
        self.lookup_table_key = key.into();
        self
    }

    /// Create configuration with a custom destination bucket
    pub fn with_data_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.data_bucket = bucket.into();
        self
    }

    /// Create configuration with a custom warehouse dataset
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Create configuration with a custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.config_bucket.trim().is_empty() {
            return Err(Error::configuration("Config bucket cannot be empty"));
        }

        if self.lookup_table_key.trim().is_empty() {
            return Err(Error::configuration("Lookup table key cannot be empty"));
        }

        if self.data_bucket.trim().is_empty() {
            return Err(Error::configuration("Data bucket cannot be empty"));
        }

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
}
