//! Environment handling for config values.
//!
//! - `${VAR_NAME}` references in YAML string values are resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` stays literal as `${VAR}`.
//! - A fixed set of variables (`MONGODB_URI`, ...) override file values afterwards.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::schema::WaCaptureConfig;

/// Matches `${VAR}` with an optional leading `$` escape captured in group 1.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const MONGODB_URI: &str = "MONGODB_URI";
pub const BRIDGE_URL: &str = "WACAPTURE_BRIDGE_URL";
pub const BRIDGE_WS_URL: &str = "WACAPTURE_BRIDGE_WS_URL";
pub const MEDIA_ROOT: &str = "WACAPTURE_MEDIA_ROOT";
pub const REJECT_CALLS: &str = "WACAPTURE_REJECT_CALLS";
pub const LOG_LEVEL: &str = "RUST_LOG";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in every string leaf of a config value tree.
pub fn resolve_env_vars(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply the fixed environment overrides on top of file values.
pub fn apply_env_overrides(
    mut config: WaCaptureConfig,
    env: &HashMap<String, String>,
) -> Result<WaCaptureConfig> {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(uri) = get(MONGODB_URI) {
        debug!(var = MONGODB_URI, "Store uri overridden from environment");
        config.store.uri = uri;
    }
    if let Some(url) = get(BRIDGE_URL) {
        config.gateway.http_url = url;
    }
    if let Some(url) = get(BRIDGE_WS_URL) {
        config.gateway.ws_url = url;
    }
    if let Some(root) = get(MEDIA_ROOT) {
        config.media.root = root;
    }
    if let Some(raw) = get(REJECT_CALLS) {
        config.calls.reject = parse_bool(&raw)
            .ok_or_else(|| anyhow::anyhow!("{REJECT_CALLS} must be a boolean, got '{raw}'"))?;
    }
    if let Some(level) = get(LOG_LEVEL) {
        config.logging.level = level;
    }
    Ok(config)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"store": {"uri": "mongodb://${DB_HOST}:27017/ww"}});
        let result = resolve_env_vars(&v, &env(&[("DB_HOST", "mongo")])).unwrap();
        assert_eq!(result["store"]["uri"], "mongodb://mongo:27017/ww");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"gateway": {"httpUrl": "${BRIDGE_HOST}"}});
        let err = resolve_env_vars(&v, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("BRIDGE_HOST"));
        assert!(err.to_string().contains("gateway.httpUrl"));
    }

    #[test]
    fn escaped_reference_stays_literal() {
        let v = json!({"media": {"root": "$${HOME}/medias"}});
        let result = resolve_env_vars(&v, &HashMap::new()).unwrap();
        assert_eq!(result["media"]["root"], "${HOME}/medias");
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = apply_env_overrides(
            WaCaptureConfig::default(),
            &env(&[
                (MONGODB_URI, "mongodb://db:27017/archive"),
                (REJECT_CALLS, "false"),
                (MEDIA_ROOT, "/var/lib/wacapture/medias"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.store.uri, "mongodb://db:27017/archive");
        assert!(!cfg.calls.reject);
        assert_eq!(cfg.media.root, "/var/lib/wacapture/medias");
    }

    #[test]
    fn invalid_boolean_override_is_error() {
        let result = apply_env_overrides(WaCaptureConfig::default(), &env(&[(REJECT_CALLS, "maybe")]));
        assert!(result.is_err());
    }
}
