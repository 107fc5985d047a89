//! `wacapture-config`: runtime configuration for the ingestion process.
//!
//! Provides:
//! - Typed config schema with per-field defaults
//! - YAML loading (a missing file means defaults)
//! - `${ENV_VAR}` substitution and fixed env overrides (`MONGODB_URI`, ...)
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, MissingEnvVarError};
pub use io::{config_file_path, read_config_value};
pub use redact::{redact, redact_uri};
pub use schema::{
    CallsConfig, GatewayConfig, LoggingConfig, MediaConfig, RevokeConfig, StoreConfig,
    WaCaptureConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// A loaded, valid config plus the warnings validation raised.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: WaCaptureConfig,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    /// Emit the validation warnings. Call once a subscriber is installed.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, detail = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply env overrides, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Warnings are
/// returned rather than logged since this usually runs before logging is up.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    load_and_prepare_with(path, &env::process_env()).await
}

/// Same as [`load_and_prepare`] against an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<PreparedConfig> {
    let config = match read_config_value(path).await? {
        Some(value) => {
            let value = resolve_env_vars(&value, env).context("Failed to resolve env vars in config")?;
            serde_json::from_value(value).context("Failed to deserialize config after env substitution")?
        }
        None => WaCaptureConfig::default(),
    };

    let config = apply_env_overrides(config, env)?;

    let report = validate(&config);
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("{}", errors.join("; "));
    }

    Ok(PreparedConfig {
        config,
        warnings: report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn env_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "store:\n  uri: mongodb://${DB_HOST}:27017/ww\n").unwrap();

        let env: HashMap<String, String> = [("DB_HOST", "filehost")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let cfg = load_and_prepare_with(&path, &env).await.unwrap().config;
        assert_eq!(cfg.store.uri, "mongodb://filehost:27017/ww");

        let mut env = env;
        env.insert("MONGODB_URI".into(), "mongodb://override:27017/ww".into());
        let cfg = load_and_prepare_with(&path, &env).await.unwrap().config;
        assert_eq!(cfg.store.uri, "mongodb://override:27017/ww");
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "store:\n  uri: redis://localhost\n").unwrap();
        let err = load_and_prepare_with(&path, &HashMap::new()).await.unwrap_err();
        assert!(err.to_string().contains("store.uri"));
    }

    #[tokio::test]
    async fn warnings_are_returned_with_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "media:\n  root: ../shared/medias\ngateway:\n  reconnectDelaySecs: 0\n").unwrap();

        let prepared = load_and_prepare_with(&path, &HashMap::new()).await.unwrap();
        assert_eq!(prepared.config.media.root, "../shared/medias");
        let paths: Vec<_> = prepared.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"media.root"));
        assert!(paths.contains(&"gateway.reconnectDelaySecs"));
    }

    #[tokio::test]
    async fn every_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wacapture.yaml");
        std::fs::write(&path, "store:\n  uri: redis://localhost\n  collection: \"\"\n").unwrap();
        let err = load_and_prepare_with(&path, &HashMap::new()).await.unwrap_err().to_string();
        assert!(err.contains("store.uri"));
        assert!(err.contains("store.collection"));
    }
}
