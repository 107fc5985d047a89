//! Media Writer: classifies received attachments and writes them below a
//! per-owner directory tree.

pub mod error;
pub mod layout;
pub mod mime_detect;
pub mod writer;

pub use error::MediaError;
pub use layout::{owner_dir, sanitize_segment, target_dir};
pub use mime_detect::extension_for_mime;
pub use writer::{MediaContext, MediaWriter, SavedMedia};
