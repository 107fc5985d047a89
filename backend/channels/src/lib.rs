//! Session gateway clients.
//!
//! The messaging network client runs as a bridge sidecar that owns pairing,
//! auth and transport; `BridgeGateway` consumes its event stream and calls its
//! HTTP operations.

pub mod bridge;
pub mod events;

pub use bridge::{BridgeConfig, BridgeGateway};
pub use events::{forward_frame, FrameOutcome};
