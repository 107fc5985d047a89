//! Config validation: field checks with user-friendly error messages.

use crate::schema::WaCaptureConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &WaCaptureConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_store(config, &mut report);
    validate_gateway(config, &mut report);
    validate_media(config, &mut report);
    report
}

fn validate_store(config: &WaCaptureConfig, report: &mut ValidationReport) {
    let store = &config.store;
    if !(store.uri.starts_with("mongodb://") || store.uri.starts_with("mongodb+srv://")) {
        report.error("store.uri", "Store uri must start with mongodb:// or mongodb+srv://");
    }
    if store.collection.trim().is_empty() {
        report.error("store.collection", "Collection name cannot be empty");
    }
}

fn validate_gateway(config: &WaCaptureConfig, report: &mut ValidationReport) {
    let gw = &config.gateway;
    if !(gw.http_url.starts_with("http://") || gw.http_url.starts_with("https://")) {
        report.error("gateway.httpUrl", "Bridge url must start with http:// or https://");
    }
    if !(gw.ws_url.starts_with("ws://") || gw.ws_url.starts_with("wss://")) {
        report.error("gateway.wsUrl", "Bridge event url must start with ws:// or wss://");
    }
    if gw.session_data_path.trim().is_empty() {
        report.warn("gateway.sessionDataPath", "Empty session path; the bridge will pick its own");
    }
    if gw.reconnect_delay_secs == 0 {
        report.warn("gateway.reconnectDelaySecs", "Reconnecting without delay may spin on a dead bridge");
    }
}

fn validate_media(config: &WaCaptureConfig, report: &mut ValidationReport) {
    let media = &config.media;
    if media.root.trim().is_empty() {
        report.error("media.root", "Media root cannot be empty");
    }
    if media.root.contains("..") {
        report.warn("media.root", "Media root contains '..'; files may land outside the working tree");
    }
}
