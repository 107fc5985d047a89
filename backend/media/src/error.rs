use std::path::PathBuf;

use thiserror::Error;
use wacapture_core::CaptureError;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no attachment to save")]
    MissingAttachment,

    #[error("attachment has no data")]
    MissingData,

    #[error("attachment has no mimetype")]
    MissingMimeType,

    #[error("unsupported mimetype: {0}")]
    UnsupportedMimeType(String),

    #[error("attachment is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    /// True when the attachment was refused before touching the filesystem.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<MediaError> for CaptureError {
    fn from(err: MediaError) -> Self {
        CaptureError::Media(err.to_string())
    }
}
