//! Bridge event stream: WebSocket frames in, validated `GatewayEvent`s out.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};
use wacapture_core::GatewayEvent;

/// What happened to one text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Forwarded,
    /// Not a valid event; logged and dropped.
    Invalid,
    /// The receiving side is gone.
    Closed,
}

/// Parse one text frame and forward it.
pub async fn forward_frame(text: &str, tx: &mpsc::Sender<GatewayEvent>) -> FrameOutcome {
    match GatewayEvent::parse(text) {
        Ok(event) => {
            debug!(event = %event, "Bridge event received");
            match tx.send(event).await {
                Ok(()) => FrameOutcome::Forwarded,
                Err(_) => FrameOutcome::Closed,
            }
        }
        Err(e) => {
            warn!(error = %e, "Dropping invalid bridge frame");
            FrameOutcome::Invalid
        }
    }
}

/// Read events from `ws_url` until the receiver closes, reconnecting after
/// `reconnect_delay` whenever the connection drops.
pub async fn run_event_stream(
    ws_url: String,
    reconnect_delay: Duration,
    tx: mpsc::Sender<GatewayEvent>,
) {
    loop {
        match tokio_tungstenite::connect_async(ws_url.as_str()).await {
            Ok((mut socket, _)) => {
                info!(url = %ws_url, "Bridge event stream connected");
                while let Some(frame) = socket.next().await {
                    match frame {
                        Ok(WsMessage::Text(text)) => {
                            if forward_frame(text.as_str(), &tx).await == FrameOutcome::Closed {
                                info!("Event receiver dropped; closing bridge stream");
                                return;
                            }
                        }
                        Ok(WsMessage::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            error!(error = %e, "Bridge event stream error");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!(url = %ws_url, error = %e, "Failed to connect to bridge event stream");
            }
        }

        if tx.is_closed() {
            return;
        }
        tokio::time::sleep(reconnect_delay).await;
        info!("Attempting to reconnect to bridge...");
    }
}
