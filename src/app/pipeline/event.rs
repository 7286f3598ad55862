//! Trigger event payload parsing
//!
//! Object-store notifications arrive in two shapes: the full notification
//! envelope with a nested `data` object, and a bare legacy payload carrying
//! `bucket` and `name` at the top level. Both normalize to a `FileEvent`.

use crate::{Error, Result};
use serde::Deserialize;

/// A normalized file-arrival event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Notification {
        #[allow(dead_code)]
        id: Option<String>,
        #[serde(rename = "type")]
        #[allow(dead_code)]
        event_type: Option<String>,
        data: NotificationData,
    },
    Legacy {
        bucket: String,
        name: String,
    },
}

#[derive(Debug, Deserialize)]
struct NotificationData {
    bucket: String,
    name: String,
    #[allow(dead_code)]
    metageneration: Option<String>,
    #[serde(rename = "timeCreated")]
    #[allow(dead_code)]
    time_created: Option<String>,
    #[allow(dead_code)]
    updated: Option<String>,
}

impl FileEvent {
    /// Parse a JSON event payload in either supported shape
    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: RawEvent = serde_json::from_str(payload)
            .map_err(|e| Error::invalid_event(format!("unrecognized event payload: {e}")))?;

        let (bucket, key) = match raw {
            RawEvent::Notification { data, .. } => (data.bucket, data.name),
            RawEvent::Legacy { bucket, name } => (bucket, name),
        };

        if bucket.is_empty() || key.is_empty() {
            return Err(Error::invalid_event("event has empty bucket or object name"));
        }

        Ok(Self { bucket, key })
    }
}
