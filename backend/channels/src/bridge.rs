use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, info};
use wacapture_core::{
    CallEvent, CaptureError, Chat, Contact, GatewayEvent, MediaAttachment, SessionGateway,
};

use crate::events::run_event_stream;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL for HTTP operations, e.g. `http://localhost:3000`
    pub http_url: String,
    /// Event stream URL, e.g. `ws://localhost:3000/events`
    pub ws_url: String,
    /// Where the bridge keeps session auth between runs
    pub session_data_path: String,
    pub reconnect_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Session gateway backed by a bridge sidecar speaking JSON over HTTP and WebSocket.
pub struct BridgeGateway {
    config: BridgeConfig,
    http_client: Client,
}

impl BridgeGateway {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.http_url.trim_end_matches('/'), path)
    }

    fn message_url(&self, message_id: &str, resource: &str) -> String {
        self.url(&format!(
            "/messages/{}/{}",
            urlencoding::encode(message_id),
            resource
        ))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: String,
    ) -> Result<T, CaptureError> {
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CaptureError::gateway(operation, e.to_string()))?;
        let response = ensure_success(operation, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CaptureError::gateway(operation, format!("invalid response body: {e}")))
    }

    async fn post_json(
        &self,
        operation: &str,
        url: String,
        body: &serde_json::Value,
    ) -> Result<Response, CaptureError> {
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CaptureError::gateway(operation, e.to_string()))?;
        ensure_success(operation, response).await
    }
}

async fn ensure_success(operation: &str, response: Response) -> Result<Response, CaptureError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CaptureError::gateway(operation, format!("bridge returned {status}: {body}")))
}

#[async_trait]
impl SessionGateway for BridgeGateway {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn initialize(&self, events: mpsc::Sender<GatewayEvent>) -> Result<(), CaptureError> {
        // Listen first so the pairing code emitted during initialization is not missed.
        tokio::spawn(run_event_stream(
            self.config.ws_url.clone(),
            self.config.reconnect_delay,
            events,
        ));

        self.post_json(
            "initialize",
            self.url("/session/initialize"),
            &serde_json::json!({ "dataPath": self.config.session_data_path }),
        )
        .await?;
        info!(bridge = %self.config.http_url, "Bridge session initializing");
        Ok(())
    }

    async fn get_contact(&self, message_id: &str) -> Result<Contact, CaptureError> {
        self.get_json("get_contact", self.message_url(message_id, "contact"))
            .await
    }

    async fn get_chat(&self, message_id: &str) -> Result<Chat, CaptureError> {
        self.get_json("get_chat", self.message_url(message_id, "chat"))
            .await
    }

    async fn download_media(
        &self,
        message_id: &str,
    ) -> Result<Option<MediaAttachment>, CaptureError> {
        let url = self.message_url(message_id, "media");
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CaptureError::gateway("download_media", e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(message_id = %message_id, "Bridge has no media for message");
            return Ok(None);
        }
        let response = ensure_success("download_media", response).await?;
        response
            .json::<Option<MediaAttachment>>()
            .await
            .map_err(|e| CaptureError::gateway("download_media", format!("invalid response body: {e}")))
    }

    async fn reject_call(&self, call: &CallEvent) -> Result<(), CaptureError> {
        let url = self.url(&format!("/calls/{}/reject", urlencoding::encode(&call.id)));
        self.post_json("reject_call", url, &serde_json::json!({})).await?;
        info!(call_id = %call.id, "Call rejected");
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), CaptureError> {
        let response = self
            .post_json(
                "send_message",
                self.url("/messages/send"),
                &serde_json::json!({ "chatId": chat_id, "text": text }),
            )
            .await?;
        let result: SendResponse = response
            .json()
            .await
            .map_err(|e| CaptureError::gateway("send_message", format!("invalid response body: {e}")))?;
        if result.ok {
            Ok(())
        } else {
            Err(CaptureError::gateway(
                "send_message",
                format!("bridge refused message: {}", result.error.unwrap_or_default()),
            ))
        }
    }
}
