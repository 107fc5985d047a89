use thiserror::Error;

/// Top-level error type for the ingestion pipeline.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("gateway error ({operation}): {message}")]
    Gateway { operation: String, message: String },

    #[error("message store error: {0}")]
    Store(String),

    #[error("could not connect to message store: {0}")]
    StoreConnection(String),

    #[error("media error: {0}")]
    Media(String),

    #[error("invalid gateway event: {0}")]
    InvalidEvent(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptureError {
    pub fn gateway(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
