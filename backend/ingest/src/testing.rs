//! In-process gateway double that records every call made against it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use wacapture_core::{
    CallEvent, CaptureError, Chat, Contact, GatewayEvent, MediaAttachment, MessageRecord,
    MessageStore, SessionGateway,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetContact(String),
    GetChat(String),
    DownloadMedia(String),
    RejectCall(String),
    SendMessage { chat_id: String, text: String },
}

#[derive(Default)]
pub struct FakeGateway {
    pub contacts: HashMap<String, Contact>,
    pub chats: HashMap<String, Chat>,
    pub media: HashMap<String, MediaAttachment>,
    pub fail_reject: bool,
    calls: Mutex<Vec<GatewayCall>>,
}

impl FakeGateway {
    /// A gateway whose call rejection always fails.
    pub fn with_failing_reject() -> Self {
        Self {
            fail_reject: true,
            ..Default::default()
        }
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: GatewayCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl SessionGateway for FakeGateway {
    fn name(&self) -> &str {
        "fake"
    }

    async fn initialize(&self, _events: mpsc::Sender<GatewayEvent>) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn get_contact(&self, message_id: &str) -> Result<Contact, CaptureError> {
        self.record(GatewayCall::GetContact(message_id.into())).await;
        self.contacts
            .get(message_id)
            .cloned()
            .ok_or_else(|| CaptureError::gateway("get_contact", "unknown message"))
    }

    async fn get_chat(&self, message_id: &str) -> Result<Chat, CaptureError> {
        self.record(GatewayCall::GetChat(message_id.into())).await;
        self.chats
            .get(message_id)
            .cloned()
            .ok_or_else(|| CaptureError::gateway("get_chat", "unknown message"))
    }

    async fn download_media(
        &self,
        message_id: &str,
    ) -> Result<Option<MediaAttachment>, CaptureError> {
        self.record(GatewayCall::DownloadMedia(message_id.into())).await;
        Ok(self.media.get(message_id).cloned())
    }

    async fn reject_call(&self, call: &CallEvent) -> Result<(), CaptureError> {
        self.record(GatewayCall::RejectCall(call.id.clone())).await;
        if self.fail_reject {
            return Err(CaptureError::gateway("reject_call", "call already ended"));
        }
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), CaptureError> {
        self.record(GatewayCall::SendMessage {
            chat_id: chat_id.into(),
            text: text.into(),
        })
        .await;
        Ok(())
    }
}

/// Store that refuses every insert.
pub struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn insert(&self, _record: MessageRecord) -> Result<String, CaptureError> {
        Err(CaptureError::Store("connection reset".into()))
    }
}
