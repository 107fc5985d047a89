use serde::{Deserialize, Serialize};

use crate::error::CaptureError;
use crate::types::{CallEvent, MessageSnapshot};

/// Every event the session gateway can surface, validated at the ingestion boundary.
///
/// Wire shape is `{"type": "<kind>", "payload": {...}}`; unit variants may omit `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A pairing code is waiting to be scanned
    Qr { code: String },
    /// Session credentials were accepted
    Authenticated,
    /// Session credentials were rejected
    AuthFailure {
        #[serde(default)]
        message: String,
    },
    /// The client finished syncing and is usable
    Ready,
    /// Sync progress while the client loads
    LoadingScreen {
        #[serde(default)]
        percent: f64,
        #[serde(default)]
        message: String,
    },
    /// An inbound message
    Message(MessageSnapshot),
    /// A message was deleted for everyone
    MessageRevokeEveryone {
        #[serde(default)]
        after: Option<MessageSnapshot>,
        #[serde(default)]
        before: Option<MessageSnapshot>,
    },
    /// An incoming or outgoing call
    Call(CallEvent),
    /// The session was logged out or dropped
    Disconnected {
        #[serde(default)]
        reason: String,
    },
}

impl GatewayEvent {
    /// Parse and validate one raw wire frame.
    pub fn parse(raw: &str) -> Result<Self, CaptureError> {
        serde_json::from_str(raw).map_err(|e| CaptureError::InvalidEvent(e.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Qr { .. } => "qr",
            Self::Authenticated => "authenticated",
            Self::AuthFailure { .. } => "auth_failure",
            Self::Ready => "ready",
            Self::LoadingScreen { .. } => "loading_screen",
            Self::Message(_) => "message",
            Self::MessageRevokeEveryone { .. } => "message_revoke_everyone",
            Self::Call(_) => "call",
            Self::Disconnected { .. } => "disconnected",
        }
    }
}

impl std::fmt::Display for GatewayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}
