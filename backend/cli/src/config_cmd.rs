//! `wacapture config`: print the effective configuration with credentials masked.

use anyhow::Result;
use wacapture_config::{redact, PreparedConfig, WaCaptureConfig};

pub fn render(config: &WaCaptureConfig) -> Result<String> {
    let value = serde_json::to_value(config)?;
    Ok(serde_json::to_string_pretty(&redact(&value))?)
}

pub fn run(prepared: &PreparedConfig) -> Result<()> {
    println!("{}", render(&prepared.config)?);
    for warning in &prepared.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
