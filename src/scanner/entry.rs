//! The `Entry` model: one filesystem node as seen by the walker.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What kind of node the walker encountered.
///
/// `Symlink` and `Unreadable` are terminal: the walker never descends into
/// them, and the classifier turns them into risk flags rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Dir,
    Symlink,
    Unreadable,
}

/// Immutable snapshot of one filesystem node encountered during a walk.
///
/// All classification inputs live here; the classifier performs no I/O of its
/// own, so identical `Entry` values always classify identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Path relative to the library root.
    pub rel_path: PathBuf,
    /// Absolute path, used for removal and path-length checks.
    pub abs_path: PathBuf,
    /// File name, lossily decoded.
    pub file_name: String,
    /// Extension, lowercase, without the leading dot; empty when none.
    pub extension: String,
    /// Byte size; zero for directories, symlinks, and unreadable nodes.
    pub size_bytes: u64,
    /// Segment count of `rel_path` (1 = directly under the root).
    pub depth: usize,
    /// Character count of the absolute path.
    pub abs_path_len: usize,
    /// Node kind observed via `symlink_metadata`.
    pub kind: NodeKind,
}

impl Entry {
    /// Build an entry for `abs_path` under `root`.
    ///
    /// `rel_path` falls back to the file name when `abs_path` is not under
    /// `root` (should not happen during a normal walk).
    pub(crate) fn from_parts(root: &Path, abs_path: &Path, size_bytes: u64, kind: NodeKind) -> Self {
        let rel_path = abs_path
            .strip_prefix(root)
            .map_or_else(|_| PathBuf::from(abs_path.file_name().unwrap_or_default()), Path::to_path_buf);
        let file_name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = abs_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let depth = rel_path.components().count();
        let abs_path_len = abs_path.to_string_lossy().chars().count();
        Self {
            rel_path,
            abs_path: abs_path.to_path_buf(),
            file_name,
            extension,
            size_bytes,
            depth,
            abs_path_len,
            kind,
        }
    }

    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    /// Whether this entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// File name stem, lowercase (used for cover-art name matching).
    #[must_use]
    pub fn stem_lower(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_derives_relative_fields() {
        let root = Path::new("/music");
        let entry = Entry::from_parts(
            root,
            Path::new("/music/Artist/Album/Track.MP3"),
            1024,
            NodeKind::File,
        );
        assert_eq!(entry.rel_path, PathBuf::from("Artist/Album/Track.MP3"));
        assert_eq!(entry.file_name, "Track.MP3");
        assert_eq!(entry.extension, "mp3");
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.abs_path_len, "/music/Artist/Album/Track.MP3".len());
        assert!(entry.is_file());
        assert!(!entry.is_dir());
    }

    #[test]
    fn extension_empty_when_absent() {
        let entry = Entry::from_parts(
            Path::new("/music"),
            Path::new("/music/README"),
            10,
            NodeKind::File,
        );
        assert_eq!(entry.extension, "");
        assert_eq!(entry.depth, 1);
    }

    #[test]
    fn stem_lower_drops_extension_and_case() {
        let entry = Entry::from_parts(
            Path::new("/music"),
            Path::new("/music/Folder.JPG"),
            10,
            NodeKind::File,
        );
        assert_eq!(entry.stem_lower(), "folder");
    }

    #[test]
    fn path_length_counts_chars_not_bytes() {
        let entry = Entry::from_parts(
            Path::new("/music"),
            Path::new("/music/Track☆.mp3"),
            10,
            NodeKind::File,
        );
        // "☆" is 3 bytes but 1 char.
        assert_eq!(entry.abs_path_len, "/music/Track☆.mp3".chars().count());
    }
}
