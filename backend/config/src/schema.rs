//! wacapture runtime configuration schema.
//!
//! Every section and field may be omitted from the YAML file; omitted values
//! take the defaults from `crate::defaults`.

use serde::{Deserialize, Serialize};
use wacapture_core::{CallPolicy, MediaLayout, RevokeMode};

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the ingestion process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaCaptureConfig {
    /// Message store connection
    pub store: StoreConfig,

    /// Session gateway bridge connection
    pub gateway: GatewayConfig,

    /// Media writer settings
    pub media: MediaConfig,

    /// Call handling policy
    pub calls: CallsConfig,

    /// Revoked message persistence
    pub revoke: RevokeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// MongoDB connection string; the path segment names the database
    pub uri: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: defaults::DEFAULT_STORE_URI.to_string(),
            collection: defaults::DEFAULT_COLLECTION.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Base URL for bridge operations (contact, chat, media, calls, send)
    pub http_url: String,
    /// WebSocket URL the bridge streams events on
    pub ws_url: String,
    /// Where the bridge persists session auth
    pub session_data_path: String,
    pub reconnect_delay_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_url: defaults::DEFAULT_BRIDGE_HTTP_URL.to_string(),
            ws_url: defaults::DEFAULT_BRIDGE_WS_URL.to_string(),
            session_data_path: defaults::DEFAULT_SESSION_DATA_PATH.to_string(),
            reconnect_delay_secs: defaults::DEFAULT_RECONNECT_DELAY_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaConfig {
    pub root: String,
    pub layout: MediaLayout,
    /// Write the owner's profile to `info.json` when their directory is first created
    pub write_owner_info: bool,
    pub skip_stickers: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: defaults::DEFAULT_MEDIA_ROOT.to_string(),
            layout: MediaLayout::default(),
            write_owner_info: false,
            skip_stickers: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Calls / revoke
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallsConfig {
    pub reject: bool,
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self { reject: true }
    }
}

impl CallsConfig {
    pub fn policy(&self) -> CallPolicy {
        CallPolicy {
            reject_calls: self.reject,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevokeConfig {
    pub mode: RevokeMode,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            dir: defaults::DEFAULT_LOG_DIR.to_string(),
        }
    }
}
