use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use wacapture_core::{Contact, MediaAttachment, MediaLayout, UserIdentification};

use crate::error::MediaError;
use crate::layout::{owner_dir, target_dir};
use crate::mime_detect::extension_for_mime;

const OWNER_INFO_FILE: &str = "info.json";

/// Who an attachment belongs to and where it was received.
#[derive(Debug, Clone)]
pub struct MediaContext {
    pub owner: UserIdentification,
    /// Conversation the attachment arrived in.
    pub chat_id: String,
    /// Full profile written to `info.json`, when known.
    pub profile: Option<Contact>,
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMedia {
    pub path: PathBuf,
    pub mimetype: String,
    pub bytes_written: usize,
    /// The owner directory did not exist before this write.
    pub created_owner_dir: bool,
}

/// A validated attachment, decoded and classified, not yet on disk.
struct PreparedMedia {
    data: Bytes,
    mimetype: String,
    extension: &'static str,
}

pub struct MediaWriter {
    root: PathBuf,
    layout: MediaLayout,
    write_owner_info: bool,
}

impl MediaWriter {
    pub fn new(root: impl Into<PathBuf>, layout: MediaLayout) -> Self {
        Self {
            root: root.into(),
            layout,
            write_owner_info: false,
        }
    }

    /// Write the owner's profile to `info.json` when their directory is first created.
    pub fn with_owner_info(mut self, enabled: bool) -> Self {
        self.write_owner_info = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save one attachment.
    ///
    /// Missing, empty, untyped and unsupported attachments are refused before
    /// any filesystem operation. Every outcome is logged here; callers may drop it.
    pub async fn save(
        &self,
        attachment: Option<&MediaAttachment>,
        ctx: &MediaContext,
    ) -> Result<SavedMedia, MediaError> {
        let result = self.try_save(attachment, ctx).await;
        match &result {
            Ok(saved) => info!(path = %saved.path.display(), bytes = saved.bytes_written, "Media saved"),
            Err(MediaError::UnsupportedMimeType(mime)) => {
                debug!(mimetype = %mime, owner = ctx.owner.folder_name(), "Skipping unsupported media")
            }
            Err(e) if e.is_rejection() => error!(error = %e, "Invalid media object"),
            Err(e) => error!(error = %e, "Error saving media"),
        }
        result
    }

    async fn try_save(
        &self,
        attachment: Option<&MediaAttachment>,
        ctx: &MediaContext,
    ) -> Result<SavedMedia, MediaError> {
        let prepared = prepare(attachment)?;

        let owner_dir = owner_dir(&self.root, &ctx.owner);
        let created_owner_dir = !fs::try_exists(&owner_dir)
            .await
            .map_err(|e| MediaError::io(&owner_dir, e))?;

        let dir = target_dir(&self.root, self.layout, &ctx.owner, &ctx.chat_id, prepared.extension);
        if !fs::try_exists(&dir).await.unwrap_or(false) {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| MediaError::io(&dir, e))?;
            info!(path = %dir.display(), "Folder created");
        }

        if created_owner_dir && self.write_owner_info {
            write_owner_info(&owner_dir, ctx).await;
        }

        let stamp = Utc::now().timestamp_millis();
        let path = write_unique(&dir, stamp, prepared.extension, &prepared.data).await?;
        Ok(SavedMedia {
            path,
            mimetype: prepared.mimetype,
            bytes_written: prepared.data.len(),
            created_owner_dir,
        })
    }
}

fn prepare(attachment: Option<&MediaAttachment>) -> Result<PreparedMedia, MediaError> {
    let attachment = attachment.ok_or(MediaError::MissingAttachment)?;
    if attachment.data.trim().is_empty() {
        return Err(MediaError::MissingData);
    }
    let mimetype = attachment
        .mimetype
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or(MediaError::MissingMimeType)?;
    let extension = extension_for_mime(mimetype)
        .ok_or_else(|| MediaError::UnsupportedMimeType(mimetype.to_string()))?;
    let data = STANDARD.decode(attachment.data.trim())?;

    Ok(PreparedMedia {
        data: Bytes::from(data),
        mimetype: mimetype.to_string(),
        extension,
    })
}

/// Best effort: failures are logged, never returned.
async fn write_owner_info(owner_dir: &Path, ctx: &MediaContext) {
    let path = owner_dir.join(OWNER_INFO_FILE);
    let json = match &ctx.profile {
        Some(profile) => to_pretty_json(profile),
        None => to_pretty_json(&ctx.owner),
    };
    let result = match json {
        Ok(json) => fs::write(&path, json).await,
        Err(e) => Err(std::io::Error::other(e)),
    };
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "Error creating user info file");
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Write `data` to `<dir>/<stamp><extension>`, adding `-N` before the
/// extension when that name is already taken.
async fn write_unique(
    dir: &Path,
    stamp: i64,
    extension: &str,
    data: &[u8],
) -> Result<PathBuf, MediaError> {
    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => format!("{stamp}{extension}"),
            n => format!("{stamp}-{n}{extension}"),
        };
        let path = dir.join(name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                write_or_remove(file, &path, data).await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(MediaError::io(&path, e)),
        }
    }
}

/// Fill a freshly created file. A partial file is removed on failure.
async fn write_or_remove<W: AsyncWrite + Unpin>(
    mut file: W,
    path: &Path,
    data: &[u8],
) -> Result<(), MediaError> {
    let result = match file.write_all(data).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "Could not remove partial media file");
        }
        return Err(MediaError::io(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn ctx(name: &str) -> MediaContext {
        MediaContext {
            owner: UserIdentification {
                display_name: Some(name.to_string()),
                numeric_id: Some("5511999998888".into()),
                sender_id: "5511999998888@c.us".into(),
            },
            chat_id: "5511999998888@c.us".into(),
            profile: Some(Contact {
                id: "5511999998888@c.us".into(),
                pushname: Some(name.to_string()),
                number: Some("5511999998888".into()),
                ..Default::default()
            }),
        }
    }

    fn jpeg() -> MediaAttachment {
        MediaAttachment::new(STANDARD.encode(JPEG_BYTES), "image/jpeg")
    }

    #[tokio::test]
    async fn writes_decoded_bytes_under_owner() {
        let tmp = TempDir::new().unwrap();
        let writer = MediaWriter::new(tmp.path().join("medias"), MediaLayout::Owner);

        let saved = writer.save(Some(&jpeg()), &ctx("Alice")).await.unwrap();

        assert_eq!(saved.path.parent().unwrap(), tmp.path().join("medias/Alice"));
        assert_eq!(saved.path.extension().unwrap(), "jpg");
        assert_eq!(std::fs::read(&saved.path).unwrap(), JPEG_BYTES);
        assert!(saved.created_owner_dir);
    }

    #[tokio::test]
    async fn owner_dir_is_created_once() {
        let tmp = TempDir::new().unwrap();
        let writer = MediaWriter::new(tmp.path(), MediaLayout::OwnerChat).with_owner_info(true);

        let first = writer.save(Some(&jpeg()), &ctx("Alice")).await.unwrap();
        let second = writer.save(Some(&jpeg()), &ctx("Alice")).await.unwrap();

        assert!(first.created_owner_dir);
        assert!(!second.created_owner_dir);
        assert_ne!(first.path, second.path);
        assert_eq!(first.path.parent(), second.path.parent());

        let info = std::fs::read_to_string(tmp.path().join("Alice/info.json")).unwrap();
        let profile: Contact = serde_json::from_str(&info).unwrap();
        assert_eq!(profile.pushname.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn owner_info_is_off_by_default() {
        let tmp = TempDir::new().unwrap();
        let writer = MediaWriter::new(tmp.path(), MediaLayout::Owner);
        writer.save(Some(&jpeg()), &ctx("Bob")).await.unwrap();
        assert!(!tmp.path().join("Bob/info.json").exists());
    }

    #[tokio::test]
    async fn extension_layout_groups_by_type() {
        let tmp = TempDir::new().unwrap();
        let writer = MediaWriter::new(tmp.path(), MediaLayout::OwnerExtension);
        let audio = MediaAttachment::new(STANDARD.encode(b"ID3"), "audio/mpeg");

        let saved = writer.save(Some(&audio), &ctx("Alice")).await.unwrap();
        assert_eq!(saved.path.parent().unwrap(), tmp.path().join("Alice/mp3"));
        assert_eq!(saved.path.extension().unwrap(), "mp3");
    }

    #[tokio::test]
    async fn rejections_touch_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("medias");
        let writer = MediaWriter::new(&root, MediaLayout::Owner);

        let err = writer.save(None, &ctx("Alice")).await.unwrap_err();
        assert!(matches!(err, MediaError::MissingAttachment));

        let untyped = MediaAttachment {
            data: STANDARD.encode(JPEG_BYTES),
            mimetype: None,
            ..Default::default()
        };
        let err = writer.save(Some(&untyped), &ctx("Alice")).await.unwrap_err();
        assert!(matches!(err, MediaError::MissingMimeType));

        let pdf = MediaAttachment::new(STANDARD.encode(b"%PDF"), "application/pdf");
        let err = writer.save(Some(&pdf), &ctx("Alice")).await.unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedMimeType(_)));
        assert!(err.is_rejection());

        let garbage = MediaAttachment::new("***not base64***", "image/png");
        let err = writer.save(Some(&garbage), &ctx("Alice")).await.unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));

        assert!(!root.exists());
    }

    #[tokio::test]
    async fn falls_back_to_number_for_folder() {
        let tmp = TempDir::new().unwrap();
        let writer = MediaWriter::new(tmp.path(), MediaLayout::Owner);
        let mut ctx = ctx("ignored");
        ctx.owner.display_name = None;

        let saved = writer.save(Some(&jpeg()), &ctx).await.unwrap();
        assert_eq!(saved.path.parent().unwrap(), tmp.path().join("5511999998888"));
    }

    #[tokio::test]
    async fn taken_name_gets_a_suffix() {
        let tmp = TempDir::new().unwrap();
        let stamp = 1_700_000_000_123;
        let taken = tmp.path().join(format!("{stamp}.jpg"));
        std::fs::write(&taken, b"original").unwrap();
        std::fs::write(tmp.path().join(format!("{stamp}-1.jpg")), b"second").unwrap();

        let path = write_unique(tmp.path(), stamp, ".jpg", JPEG_BYTES).await.unwrap();

        assert_eq!(path, tmp.path().join(format!("{stamp}-2.jpg")));
        assert_eq!(std::fs::read(&path).unwrap(), JPEG_BYTES);
        assert_eq!(std::fs::read(&taken).unwrap(), b"original");
    }

    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("disk full")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("1700000000123.jpg");
        std::fs::write(&path, b"").unwrap();

        let err = write_or_remove(BrokenPipe, &path, JPEG_BYTES).await.unwrap_err();

        assert!(matches!(err, MediaError::Io { .. }));
        assert!(!err.is_rejection());
        assert!(!path.exists());
    }
}
