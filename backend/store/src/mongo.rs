use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, Bson};
use mongodb::{Client, Collection};
use serde::Serialize;
use tracing::{debug, info};

use wacapture_core::{CaptureError, MessageRecord, MessageStore, QuotedMessage};

/// Database used when the connection string names none.
pub const DEFAULT_DATABASE: &str = "ww";

/// On-disk shape of a message record. Timestamps are native BSON dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    pub is_forwarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_score: Option<i64>,
    pub has_quoted_msg: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_msg: Option<QuotedMessage>,
    pub is_gif: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

fn to_bson_date(dt: Option<DateTime<Utc>>, fallback: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.unwrap_or(fallback).timestamp_millis())
}

impl From<MessageRecord> for MessageDocument {
    fn from(record: MessageRecord) -> Self {
        let now = Utc::now();
        Self {
            from: record.from,
            to: record.to,
            body: record.body,
            timestamp: record.timestamp,
            has_media: record.has_media,
            device_type: record.device_type,
            is_forwarded: record.is_forwarded.unwrap_or(false),
            forwarded_score: record.forwarded_score,
            has_quoted_msg: record.has_quoted_msg.unwrap_or(false),
            quoted_msg: record.quoted_msg,
            is_gif: record.is_gif.unwrap_or(false),
            mimetype: record.mimetype,
            created_at: to_bson_date(record.created_at, now),
            updated_at: to_bson_date(record.updated_at, now),
        }
    }
}

/// MongoDB-backed message store, one collection of message documents.
pub struct MongoMessageStore {
    collection: Collection<MessageDocument>,
}

impl MongoMessageStore {
    /// Connect and ping the server once. Any failure is a `StoreConnection` error.
    pub async fn connect(uri: &str, collection: &str) -> Result<Self, CaptureError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| CaptureError::StoreConnection(e.to_string()))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| CaptureError::StoreConnection(e.to_string()))?;

        info!(database = %database.name(), collection = %collection, "Connected to MongoDB");
        Ok(Self {
            collection: database.collection(collection),
        })
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn insert(&self, record: MessageRecord) -> Result<String, CaptureError> {
        let document = MessageDocument::from(record);
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| CaptureError::Store(e.to_string()))?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        debug!(id = %id, "Message document inserted");
        Ok(id)
    }
}
