//! Config file lookup and loading.

use crate::defaults::DEFAULT_CONFIG_FILE;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Env var naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "WACAPTURE_CONFIG";

/// Resolve the config file path.
/// Priority: `WACAPTURE_CONFIG` env > `./wacapture.yaml`
pub fn config_file_path() -> PathBuf {
    std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read the raw YAML config as a JSON value tree.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub async fn read_config_value(path: &Path) -> Result<Option<serde_json::Value>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        debug!(path = %path.display(), "Config file is empty; using defaults");
        return Ok(None);
    }

    let value: serde_json::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(Some(value).filter(|v: &serde_json::Value| !v.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let value = read_config_value(&dir.path().join("absent.yaml")).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn empty_and_null_files_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "").unwrap();
        assert!(read_config_value(&path).await.unwrap().is_none());
        std::fs::write(&path, "~\n").unwrap();
        assert!(read_config_value(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_yaml_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "media:\n  layout: owner_extension\n").unwrap();
        let value = read_config_value(&path).await.unwrap().unwrap();
        assert_eq!(value["media"]["layout"], "owner_extension");
    }

    #[tokio::test]
    async fn malformed_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "media: [unclosed").unwrap();
        assert!(read_config_value(&path).await.is_err());
    }
}
