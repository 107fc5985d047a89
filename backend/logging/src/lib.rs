//! Structured logging for wacapture.
//!
//! Console plus rolling NDJSON file output, log redaction, and the ingest event log.

pub mod ingest_logger;
pub mod logger;
pub mod redact;

pub use ingest_logger::{IngestEvent, IngestLogEntry, IngestLogger};
pub use logger::{init_logger, LoggerGuard};
pub use redact::redact_sensitive_data;
