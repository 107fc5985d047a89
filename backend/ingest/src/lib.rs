//! Ingestion handlers: one stateless reaction per gateway event kind.

pub mod dispatch;
pub mod handler;
pub mod notify;
pub mod qr;
pub mod revoke;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::run;
pub use handler::{
    CallOutcome, HandlerOutcome, HandlerSettings, IngestionHandler, MediaOutcome, RevokeOutcome,
};
pub use notify::call_notification;
pub use qr::render_qr;
