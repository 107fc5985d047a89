//! Directory layout below the media root.

use std::path::{Path, PathBuf};

use wacapture_core::{MediaLayout, UserIdentification};

/// Make a display name or id safe to use as one path component.
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// `<root>/<owner>`
pub fn owner_dir(root: &Path, owner: &UserIdentification) -> PathBuf {
    root.join(sanitize_segment(owner.folder_name()))
}

/// Directory a file with `extension` for `owner` in `chat_id` is written to.
pub fn target_dir(
    root: &Path,
    layout: MediaLayout,
    owner: &UserIdentification,
    chat_id: &str,
    extension: &str,
) -> PathBuf {
    let owner_dir = owner_dir(root, owner);
    match layout {
        MediaLayout::Owner => owner_dir,
        MediaLayout::OwnerChat => owner_dir.join(sanitize_segment(chat_id)),
        MediaLayout::OwnerExtension => {
            owner_dir.join(sanitize_segment(extension.trim_start_matches('.')))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserIdentification {
        UserIdentification {
            display_name: Some("Alice".into()),
            numeric_id: Some("5511".into()),
            sender_id: "5511@c.us".into(),
        }
    }

    #[test]
    fn layouts() {
        let root = Path::new("medias");
        assert_eq!(
            target_dir(root, MediaLayout::Owner, &alice(), "5511@c.us", ".jpg"),
            PathBuf::from("medias/Alice")
        );
        assert_eq!(
            target_dir(root, MediaLayout::OwnerChat, &alice(), "120363@g.us", ".jpg"),
            PathBuf::from("medias/Alice/120363@g.us")
        );
        assert_eq!(
            target_dir(root, MediaLayout::OwnerExtension, &alice(), "5511@c.us", ".mp3"),
            PathBuf::from("medias/Alice/mp3")
        );
    }

    #[test]
    fn sanitizes_separators_and_dot_segments() {
        assert_eq!(sanitize_segment("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_segment(".."), "_");
        assert_eq!(sanitize_segment("  "), "_");
    }
}
