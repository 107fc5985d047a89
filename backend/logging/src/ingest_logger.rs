//! Ingest Event Logger
//!
//! Structured events (media saved/skipped, record persisted, call handled, lifecycle)
//! written through `tracing` under the `ingest_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IngestEvent {
    MediaSaved {
        owner: String,
        path: String,
        mimetype: String,
    },
    MediaSkipped {
        owner: String,
        reason: String,
    },
    RecordPersisted {
        from: String,
        record_id: String,
    },
    CallHandled {
        from: String,
        rejected: bool,
    },
    Lifecycle {
        stage: String,
        detail: String,
    },
}

impl IngestEvent {
    fn redact(&mut self) {
        match self {
            Self::MediaSaved { owner, path, .. } => {
                *owner = redact_sensitive_data(owner);
                *path = redact_sensitive_data(path);
            }
            Self::MediaSkipped { owner, reason } => {
                *owner = redact_sensitive_data(owner);
                *reason = redact_sensitive_data(reason);
            }
            Self::RecordPersisted { from, .. } | Self::CallHandled { from, .. } => {
                *from = redact_sensitive_data(from);
            }
            Self::Lifecycle { detail, .. } => {
                *detail = redact_sensitive_data(detail);
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: IngestEvent,
}

pub struct IngestLogger;

impl IngestLogger {
    /// Redact and emit one ingest event.
    pub fn log_event(event: IngestEvent) {
        let entry = Self::entry(event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "ingest_events", event = %json, "Ingest event"),
            Err(e) => warn!(target: "ingest_events", error = %e, "Unserializable ingest event"),
        }
    }

    fn entry(mut event: IngestEvent) -> IngestLogEntry {
        event.redact();
        IngestLogEntry {
            timestamp: Utc::now(),
            event,
        }
    }
}
