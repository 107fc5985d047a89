//! Default values for every config field.

/// Document store used when neither the file nor `MONGODB_URI` names one.
pub const DEFAULT_STORE_URI: &str = "mongodb://localhost:27017/ww";

pub const DEFAULT_COLLECTION: &str = "messages";

pub const DEFAULT_BRIDGE_HTTP_URL: &str = "http://localhost:3000";

pub const DEFAULT_BRIDGE_WS_URL: &str = "ws://localhost:3000/events";

pub const DEFAULT_SESSION_DATA_PATH: &str = "auth";

/// Seconds to wait before reconnecting a dropped event stream.
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;

pub const DEFAULT_MEDIA_ROOT: &str = "medias";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wacapture.yaml";
