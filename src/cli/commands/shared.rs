//! Shared components for CLI commands
//!
//! Logging setup and the event-target helpers used across the route and
//! load commands.

use crate::app::pipeline::FileEvent;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Set up structured logging to stderr
///
/// `RUST_LOG` overrides the level derived from the CLI flags.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sensor_router={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Read and parse a JSON trigger event payload from disk
pub fn read_event_file(path: &Path) -> Result<FileEvent> {
    let payload = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!(
            "Failed to read event file '{}': {}",
            path.display(),
            e
        ))
    })?;
    FileEvent::from_json(&payload)
}

/// Resolve the CLI target flags into a single event, if not in prefix mode
///
/// `--key` takes the default bucket; `--event-file` carries its own bucket
/// in the payload.
pub fn resolve_single_event(
    bucket: &str,
    key: &Option<String>,
    event_file: &Option<std::path::PathBuf>,
) -> Result<Option<FileEvent>> {
    if let Some(key) = key {
        return Ok(Some(FileEvent {
            bucket: bucket.to_string(),
            key: key.clone(),
        }));
    }
    if let Some(path) = event_file {
        return Ok(Some(read_event_file(path)?));
    }
    Ok(None)
}
