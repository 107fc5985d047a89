use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pseudo-account the platform uses as sender for status updates.
pub const STATUS_BROADCAST_ID: &str = "status@broadcast";

/// Kind of an inbound message as reported by the gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Chat,
    Image,
    Video,
    Audio,
    Ptt,
    Sticker,
    Document,
    Revoked,
    #[serde(other)]
    Unknown,
}

/// The quoted message a reply points at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotedMessage {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A message as delivered by the gateway, either inbound or as a revoke snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSnapshot {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub is_forwarded: Option<bool>,
    #[serde(default)]
    pub forwarded_score: Option<i64>,
    #[serde(default)]
    pub has_quoted_msg: Option<bool>,
    #[serde(default)]
    pub quoted_msg: Option<QuotedMessage>,
    #[serde(default)]
    pub is_gif: Option<bool>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

impl MessageSnapshot {
    /// Copy the persisted fields of this snapshot into a record carrying `body`.
    pub fn to_record(&self, body: impl Into<String>) -> MessageRecord {
        MessageRecord {
            from: Some(self.from.clone()),
            to: Some(self.to.clone()),
            body: Some(body.into()),
            timestamp: self.timestamp,
            has_media: Some(self.has_media),
            device_type: self.device_type.clone(),
            is_forwarded: Some(self.is_forwarded.unwrap_or(false)),
            forwarded_score: self.forwarded_score,
            has_quoted_msg: Some(self.has_quoted_msg.unwrap_or(false)),
            quoted_msg: self.quoted_msg.clone(),
            is_gif: Some(self.is_gif.unwrap_or(false)),
            mimetype: self.mimetype.clone(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_status_broadcast(&self) -> bool {
        self.from == STATUS_BROADCAST_ID
    }
}

/// One persisted message or revocation document.
///
/// All fields are optional; the store assigns `created_at`/`updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_media: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_forwarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_quoted_msg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_msg: Option<QuotedMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_gif: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MessageRecord {
    /// Set both store timestamps to now.
    pub fn stamped(mut self) -> Self {
        let now = Utc::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
        self
    }
}

/// A contact profile resolved by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub is_business: bool,
    #[serde(default)]
    pub is_my_contact: bool,
}

impl Contact {
    pub fn is_status_broadcast(&self) -> bool {
        self.id == STATUS_BROADCAST_ID
    }
}

/// A conversation resolved by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_group: bool,
}

/// A downloaded attachment. `data` is base64 encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl MediaAttachment {
    pub fn new(data: impl Into<String>, mimetype: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mimetype: Some(mimetype.into()),
            ..Default::default()
        }
    }
}

/// Who a media file belongs to, used only to pick its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentification {
    pub display_name: Option<String>,
    pub numeric_id: Option<String>,
    pub sender_id: String,
}

impl UserIdentification {
    pub fn from_contact(contact: &Contact, sender_id: &str) -> Self {
        Self {
            display_name: contact.pushname.clone(),
            numeric_id: contact.number.clone(),
            sender_id: sender_id.to_string(),
        }
    }

    /// Sentinel identity for messages sent by the status broadcast pseudo-account.
    pub fn status_broadcast() -> Self {
        Self {
            display_name: Some("Status".to_string()),
            numeric_id: Some("0".to_string()),
            sender_id: STATUS_BROADCAST_ID.to_string(),
        }
    }

    /// Display name, else numeric id, else the raw sender id.
    pub fn folder_name(&self) -> &str {
        [self.display_name.as_deref(), self.numeric_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(&self.sender_id)
    }
}

/// An inbound or outbound call signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEvent {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// How media files are grouped below an owner's directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaLayout {
    /// `<root>/<owner>/`
    Owner,
    /// `<root>/<owner>/<chat id>/`
    #[default]
    OwnerChat,
    /// `<root>/<owner>/<extension>/`
    OwnerExtension,
}

/// How a revoked message pair is persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RevokeMode {
    /// One record whose body joins the before and after text.
    #[default]
    Merged,
    /// One record per available snapshot, prefixed `BEFORE: ` / `AFTER: `.
    Split,
}

/// Process-wide call handling policy, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPolicy {
    pub reject_calls: bool,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self { reject_calls: true }
    }
}
