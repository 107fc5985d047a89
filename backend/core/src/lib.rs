pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::CaptureError;
pub use event::GatewayEvent;
pub use traits::{MessageStore, SessionGateway};
pub use types::{
    CallEvent, CallPolicy, Chat, Contact, MediaAttachment, MediaLayout, MessageRecord,
    MessageSnapshot, MessageType, QuotedMessage, RevokeMode, UserIdentification, STATUS_BROADCAST_ID,
};
