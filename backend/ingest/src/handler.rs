use std::sync::Arc;

use tracing::{debug, error, info, warn};
use wacapture_core::{
    CallEvent, CallPolicy, CaptureError, GatewayEvent, MessageSnapshot, MessageStore, MessageType,
    RevokeMode, SessionGateway, UserIdentification,
};
use wacapture_logging::{IngestEvent, IngestLogger};
use wacapture_media::{MediaContext, MediaError, MediaWriter, SavedMedia};

use crate::notify::call_notification;
use crate::qr::render_qr;
use crate::revoke::{revoke_records, revoked_text};

/// Startup-time policy for the handler set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerSettings {
    pub call_policy: CallPolicy,
    pub revoke_mode: RevokeMode,
    pub skip_stickers: bool,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            call_policy: CallPolicy::default(),
            revoke_mode: RevokeMode::default(),
            skip_stickers: true,
        }
    }
}

#[derive(Debug)]
pub enum MediaOutcome {
    /// The message carried no attachment.
    NoMedia,
    SkippedSticker,
    Saved(SavedMedia),
    /// The writer refused or failed; already logged.
    Dropped(MediaError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RevokeOutcome {
    /// Store ids of the records written.
    pub persisted: Vec<String>,
    /// Records the store refused; already logged, not retried.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub rejected: bool,
    pub notification: String,
}

#[derive(Debug)]
pub enum HandlerOutcome {
    /// Lifecycle events: diagnostic output only.
    Logged,
    /// The rendered pairing code printed to the console.
    Qr(String),
    Media(MediaOutcome),
    Revoke(RevokeOutcome),
    Call(CallOutcome),
}

/// Reacts to gateway events. Holds no state across events besides its settings.
pub struct IngestionHandler {
    gateway: Arc<dyn SessionGateway>,
    store: Arc<dyn MessageStore>,
    media: MediaWriter,
    settings: HandlerSettings,
}

fn lifecycle(stage: &str, detail: impl Into<String>) {
    IngestLogger::log_event(IngestEvent::Lifecycle {
        stage: stage.to_string(),
        detail: detail.into(),
    });
}

impl IngestionHandler {
    pub fn new(
        gateway: Arc<dyn SessionGateway>,
        store: Arc<dyn MessageStore>,
        media: MediaWriter,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            media,
            settings,
        }
    }

    /// Run the handler for one event.
    pub async fn handle(&self, event: GatewayEvent) -> Result<HandlerOutcome, CaptureError> {
        match event {
            GatewayEvent::Qr { code } => Ok(HandlerOutcome::Qr(self.on_qr(&code))),
            GatewayEvent::Authenticated => {
                info!("AUTHENTICATED");
                lifecycle("authenticated", "");
                Ok(HandlerOutcome::Logged)
            }
            GatewayEvent::AuthFailure { message } => {
                error!(reason = %message, "AUTHENTICATION FAILURE");
                lifecycle("auth_failure", message);
                Ok(HandlerOutcome::Logged)
            }
            GatewayEvent::Ready => {
                info!("READY");
                lifecycle("ready", "");
                Ok(HandlerOutcome::Logged)
            }
            GatewayEvent::LoadingScreen { percent, message } => {
                info!(percent, detail = %message, "LOADING SCREEN");
                Ok(HandlerOutcome::Logged)
            }
            GatewayEvent::Message(msg) => self.on_message(&msg).await.map(HandlerOutcome::Media),
            GatewayEvent::MessageRevokeEveryone { after, before } => Ok(HandlerOutcome::Revoke(
                self.on_revoke(before.as_ref(), after.as_ref()).await,
            )),
            GatewayEvent::Call(call) => self.on_call(&call).await.map(HandlerOutcome::Call),
            GatewayEvent::Disconnected { reason } => {
                warn!(reason = %reason, "Client was logged out");
                lifecycle("disconnected", reason);
                Ok(HandlerOutcome::Logged)
            }
        }
    }

    /// Print the pairing code to the operator console.
    pub fn on_qr(&self, code: &str) -> String {
        let rendered = render_qr(code).unwrap_or_else(|e| {
            warn!(error = %e, "Could not render pairing code; printing it raw");
            code.to_string()
        });
        println!("{rendered}");
        info!("QR RECEIVED");
        rendered
    }

    /// Save the attachment of an inbound message, if it carries one.
    pub async fn on_message(&self, msg: &MessageSnapshot) -> Result<MediaOutcome, CaptureError> {
        if !msg.has_media {
            return Ok(MediaOutcome::NoMedia);
        }
        if self.settings.skip_stickers && msg.kind == MessageType::Sticker {
            debug!(message_id = %msg.id, "Skipping sticker media");
            return Ok(MediaOutcome::SkippedSticker);
        }

        let contact = self.gateway.get_contact(&msg.id).await?;
        let attachment = self.gateway.download_media(&msg.id).await?;

        let (owner, profile) = if msg.is_status_broadcast() || contact.is_status_broadcast() {
            (UserIdentification::status_broadcast(), None)
        } else {
            (UserIdentification::from_contact(&contact, &msg.from), Some(contact))
        };

        let chat_id = match self.gateway.get_chat(&msg.id).await {
            Ok(chat) => chat.id,
            Err(e) => {
                warn!(message_id = %msg.id, error = %e, "Could not resolve chat; routing by sender");
                msg.from.clone()
            }
        };

        let ctx = MediaContext {
            owner,
            chat_id,
            profile,
        };
        match self.media.save(attachment.as_ref(), &ctx).await {
            Ok(saved) => {
                IngestLogger::log_event(IngestEvent::MediaSaved {
                    owner: ctx.owner.folder_name().to_string(),
                    path: saved.path.display().to_string(),
                    mimetype: saved.mimetype.clone(),
                });
                Ok(MediaOutcome::Saved(saved))
            }
            Err(e) => {
                IngestLogger::log_event(IngestEvent::MediaSkipped {
                    owner: ctx.owner.folder_name().to_string(),
                    reason: e.to_string(),
                });
                Ok(MediaOutcome::Dropped(e))
            }
        }
    }

    /// Persist a revoked message. Store failures are logged and counted, never retried.
    pub async fn on_revoke(
        &self,
        before: Option<&MessageSnapshot>,
        after: Option<&MessageSnapshot>,
    ) -> RevokeOutcome {
        let records = revoke_records(self.settings.revoke_mode, before, after);
        if records.is_empty() {
            warn!("Revoke event carried no message snapshots");
        }

        let mut outcome = RevokeOutcome::default();
        for record in records {
            let from = record.from.clone().unwrap_or_default();
            match self.store.insert(record).await {
                Ok(id) => {
                    info!(store = self.store.name(), id = %id, "Message saved");
                    IngestLogger::log_event(IngestEvent::RecordPersisted {
                        from,
                        record_id: id.clone(),
                    });
                    outcome.persisted.push(id);
                }
                Err(e) => {
                    error!(store = self.store.name(), error = %e, "Error saving message");
                    outcome.failed += 1;
                }
            }
        }

        self.log_revocation(before, after).await;
        outcome
    }

    /// `[<chat>] <user> revoked a message: <text>`; resolution failures only degrade the labels.
    async fn log_revocation(&self, before: Option<&MessageSnapshot>, after: Option<&MessageSnapshot>) {
        let Some(source) = before.or(after) else {
            return;
        };
        let user = match self.gateway.get_contact(&source.id).await {
            Ok(contact) => UserIdentification::from_contact(&contact, &source.from)
                .folder_name()
                .to_string(),
            Err(_) => source.from.clone(),
        };
        let chat = match self.gateway.get_chat(&source.id).await {
            Ok(chat) => chat.name.unwrap_or(chat.id),
            Err(_) => source.to.clone(),
        };
        info!("[{chat}] {user} revoked a message: {}", revoked_text(before, after));
    }

    /// Apply the call policy and tell the caller what happened.
    pub async fn on_call(&self, call: &CallEvent) -> Result<CallOutcome, CaptureError> {
        info!(
            from = %call.from,
            video = call.is_video,
            group = call.is_group,
            reject = self.settings.call_policy.reject_calls,
            "Call received"
        );

        let rejected = if self.settings.call_policy.reject_calls {
            match self.gateway.reject_call(call).await {
                Ok(()) => true,
                Err(e) => {
                    error!(call_id = %call.id, error = %e, "Failed to reject call");
                    false
                }
            }
        } else {
            false
        };

        let notification = call_notification(call, rejected);
        self.gateway.send_message(&call.from, &notification).await?;
        IngestLogger::log_event(IngestEvent::CallHandled {
            from: call.from.clone(),
            rejected,
        });

        Ok(CallOutcome {
            rejected,
            notification,
        })
    }
}
