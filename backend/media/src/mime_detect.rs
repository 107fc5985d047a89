//! MIME type classification for received attachments.
//!
//! Only four families are kept. Checks are substring matches against the
//! declared mimetype, evaluated in table order; the first match wins.

/// Ordered `(needle, extension)` table.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("jpeg", ".jpg"),
    ("png", ".png"),
    ("mpeg", ".mp3"),
    ("ogg", ".mp4"),
    ("mp4", ".mp4"),
];

/// File extension (with leading dot) for a declared mimetype, or `None` when unsupported.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    EXTENSION_TABLE
        .iter()
        .find(|(needle, _)| mime.contains(needle))
        .map(|(_, ext)| *ext)
}
