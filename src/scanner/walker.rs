//! Single-threaded lazy directory walker with stable ordering.
//!
//! The walker is the "eyes" of the sweep: it discovers every node under the
//! library root and hands immutable [`Entry`] snapshots to the classifier.
//! Traversal is depth-first with parents emitted before children, and the
//! children of each directory are sorted by name, so two walks over an
//! unchanged tree yield the same sequence.
//!
//! Failure policy: only a bad root aborts. Symlinks are emitted as leaves and
//! never followed (no cycles); a node whose metadata or listing cannot be
//! read degrades to [`NodeKind::Unreadable`] and the walk continues.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, SweepError};
use crate::scanner::entry::{Entry, NodeKind};

/// Lazy depth-first iterator over a library tree.
///
/// The root itself is not emitted; depth 1 is a direct child of the root.
#[derive(Debug)]
pub struct TreeWalker {
    root: PathBuf,
    /// Pending entries; directories are expanded when popped.
    stack: Vec<Entry>,
}

impl TreeWalker {
    /// Validate the root and prime the walk.
    ///
    /// Fails with [`SweepError::InvalidRoot`] when the root is missing, not a
    /// directory, or cannot be listed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let meta = fs::symlink_metadata(&root).map_err(|err| SweepError::InvalidRoot {
            path: root.clone(),
            details: err.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(SweepError::InvalidRoot {
                path: root,
                details: "not a directory".to_string(),
            });
        }

        let mut walker = Self {
            root: root.clone(),
            stack: Vec::new(),
        };
        // An unlistable root means nothing can be scanned at all; unlike
        // subdirectories this is fatal.
        walker
            .push_children(&root)
            .map_err(|err| SweepError::InvalidRoot {
                path: walker.root.clone(),
                details: err.to_string(),
            })?;
        Ok(walker)
    }

    /// List `dir`, build child entries, and push them so they pop in name
    /// order. The directory handle is fully drained and dropped here, before
    /// any entry is yielded.
    fn push_children(&mut self, dir: &Path) -> std::io::Result<()> {
        let mut children: Vec<Entry> = Vec::new();
        for dirent in fs::read_dir(dir)? {
            let Ok(dirent) = dirent else {
                continue;
            };
            children.push(self.child_entry(&dirent.path()));
        }
        // Byte order on the lossy name: stable and locale-independent.
        children.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        // Reversed push so the stack pops smallest-name first.
        children.reverse();
        self.stack.append(&mut children);
        Ok(())
    }

    fn child_entry(&self, path: &Path) -> Entry {
        match fs::symlink_metadata(path) {
            Ok(meta) => {
                let file_type = meta.file_type();
                let (kind, size) = if file_type.is_symlink() {
                    (NodeKind::Symlink, 0)
                } else if file_type.is_dir() {
                    (NodeKind::Dir, 0)
                } else {
                    (NodeKind::File, meta.len())
                };
                Entry::from_parts(&self.root, path, size, kind)
            }
            // Race-deleted or permission-denied nodes become findings, not
            // failures.
            Err(_) => Entry::from_parts(&self.root, path, 0, NodeKind::Unreadable),
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let mut entry = self.stack.pop()?;
        if entry.kind == NodeKind::Dir {
            let dir = entry.abs_path.clone();
            if self.push_children(&dir).is_err() {
                entry.kind = NodeKind::Unreadable;
            }
        }
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn walks_files_and_dirs_depth_first() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Artist/Album")).unwrap();
        touch(&tmp.path().join("Artist/Album/01 Track.mp3"));
        touch(&tmp.path().join("loose.mp3"));

        let entries: Vec<Entry> = TreeWalker::new(tmp.path()).unwrap().collect();
        let rels: Vec<String> = entries
            .iter()
            .map(|e| e.rel_path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            rels,
            vec!["Artist", "Artist/Album", "Artist/Album/01 Track.mp3", "loose.mp3"]
        );
        assert_eq!(entries[0].kind, NodeKind::Dir);
        assert_eq!(entries[2].kind, NodeKind::File);
        assert_eq!(entries[2].depth, 3);
        assert_eq!(entries[2].size_bytes, 1);
    }

    #[test]
    fn two_walks_yield_the_same_order() {
        let tmp = TempDir::new().unwrap();
        for name in ["zeta.mp3", "alpha.mp3", "Mid.flac", "01.ogg"] {
            touch(&tmp.path().join(name));
        }
        fs::create_dir(tmp.path().join("dir")).unwrap();
        touch(&tmp.path().join("dir/inner.mp3"));

        let first: Vec<PathBuf> = TreeWalker::new(tmp.path())
            .unwrap()
            .map(|e| e.rel_path)
            .collect();
        let second: Vec<PathBuf> = TreeWalker::new(tmp.path())
            .unwrap()
            .map(|e| e.rel_path)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_is_invalid() {
        let err = TreeWalker::new("/definitely/does/not/exist").unwrap_err();
        assert_eq!(err.code(), "DAP-2001");
    }

    #[test]
    fn file_root_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir.mp3");
        touch(&file);
        let err = TreeWalker::new(&file).unwrap_err();
        assert_eq!(err.code(), "DAP-2001");
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_emitted_but_not_followed() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir(&real).unwrap();
        touch(&real.join("inside.mp3"));
        std::os::unix::fs::symlink(&real, tmp.path().join("link")).unwrap();

        let entries: Vec<Entry> = TreeWalker::new(tmp.path()).unwrap().collect();
        let link = entries
            .iter()
            .find(|e| e.file_name == "link")
            .expect("symlink entry");
        assert_eq!(link.kind, NodeKind::Symlink);
        // Nothing under the link shows up twice.
        let inside_count = entries
            .iter()
            .filter(|e| e.file_name == "inside.mp3")
            .count();
        assert_eq!(inside_count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_subdir_degrades_to_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        touch(&tmp.path().join("ok.mp3"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions; nothing to exercise then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let entries: Vec<Entry> = TreeWalker::new(tmp.path()).unwrap().collect();

        // Restore so TempDir can clean up.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let locked_entry = entries
            .iter()
            .find(|e| e.file_name == "locked")
            .expect("locked entry");
        assert_eq!(locked_entry.kind, NodeKind::Unreadable);
        assert!(entries.iter().any(|e| e.file_name == "ok.mp3"));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(TreeWalker::new(tmp.path()).unwrap().count(), 0);
    }
}
