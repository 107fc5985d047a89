use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::CaptureError;
use crate::event::GatewayEvent;
use crate::types::{CallEvent, Chat, Contact, MediaAttachment, MessageRecord};

/// Connection to the messaging network. Pairing, auth and transport live behind it.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Human-readable gateway name for logging.
    fn name(&self) -> &str;

    /// Start the session and begin forwarding events into `events`.
    async fn initialize(&self, events: mpsc::Sender<GatewayEvent>) -> Result<(), CaptureError>;

    /// Resolve the sender of a message.
    async fn get_contact(&self, message_id: &str) -> Result<Contact, CaptureError>;

    /// Resolve the conversation a message belongs to.
    async fn get_chat(&self, message_id: &str) -> Result<Chat, CaptureError>;

    /// Download the attachment of a message. `None` when nothing could be fetched.
    async fn download_media(&self, message_id: &str)
        -> Result<Option<MediaAttachment>, CaptureError>;

    async fn reject_call(&self, call: &CallEvent) -> Result<(), CaptureError>;

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), CaptureError>;
}

/// Document store holding one record per persisted message or revocation.
#[async_trait]
pub trait MessageStore: Send + Sync {
    fn name(&self) -> &str;

    /// Insert a record and return the id the store assigned to it.
    async fn insert(&self, record: MessageRecord) -> Result<String, CaptureError>;
}
