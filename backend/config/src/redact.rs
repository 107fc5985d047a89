//! Config redaction: produce safe-to-print config snapshots.
//!
//! Masks credentials embedded in connection strings and any secret-like keys.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECRET_KEYS: &[&str] = &["password", "secret", "token", "apiKey", "api_key"];

/// `scheme://user:password@`; the password part is masked.
static URI_CREDENTIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9+.-]*://[^:/@]+):[^@]*@").unwrap());

/// Redact a config JSON value, masking credentials and sensitive fields with `***`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Mask the password component of a connection string.
pub fn redact_uri(uri: &str) -> String {
    URI_CREDENTIALS.replace(uri, "$1:***@").into_owned()
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => Value::String("***".into()),
        Value::String(s) => Value::String(redact_uri(s)),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
