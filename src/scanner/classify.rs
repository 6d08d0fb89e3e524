//! Path classifier: verdicts and risk flags for one entry at a time.
//!
//! Pure rule evaluation over [`Entry`] attributes — no I/O, no panics, total
//! over well-formed entries. The verdict chain is first-match-wins; risk
//! flags accumulate independently of the verdict, so an audio file deep in a
//! mangled path is still `Keep` but carries every applicable flag.

#![allow(missing_docs)]

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::scanner::entry::{Entry, NodeKind};

/// Why an entry is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    /// Extension is in the audio allowlist.
    Audio,
    /// Extension is in the album-art allowlist.
    CoverArt,
    /// Ordinary directory; only specific junk names make a directory removable.
    Directory,
    /// Unrecognized file type — conservative default, never auto-deleted.
    Unrecognized,
}

/// Why an entry is safe to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunkReason {
    /// macOS AppleDouble sidecar (`._*`).
    AppleDoubleSidecar,
    /// Exact junk metadata file name (`.DS_Store`, `Thumbs.db`, ...).
    JunkFileName,
    /// Known junk directory name (`__MACOSX`, `.Trashes`, ...).
    JunkDirName,
    /// Playlist/db/log/editor clutter extension.
    JunkExtension,
}

/// Primary classification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Keep(KeepReason),
    RemoveJunk(JunkReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_junk(&self) -> bool {
        matches!(self, Self::RemoveJunk(_))
    }
}

/// Compatibility risk observed on an entry. Additive, not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    /// Nested deeper than `scan.max_depth` below the library root.
    DeepNesting,
    /// Absolute path longer than `scan.max_path_len` characters.
    LongPath,
    /// File name longer than `scan.max_file_name_len` characters.
    LongFileName,
    /// File name contains characters outside printable ASCII.
    NonAscii,
    /// File name contains `<>:"/\|?*` or ASCII control characters.
    ProblematicChar,
    /// Leading/trailing or doubled spaces in the file name.
    SuspiciousWhitespace,
    /// Regular file with zero bytes.
    ZeroByte,
    /// Art file whose name is unlikely to be picked up as the album cover.
    ArtNamingRisk,
    /// Optional sidecar extension (`.cue`, `.nfo`, ...) some devices choke on.
    OptionalSidecar,
    /// Symbolic link; not traversed and never removed.
    UnsupportedLinkType,
    /// Entry metadata or listing could not be read.
    UnreadableEntry,
}

/// Verdict plus accumulated risk flags for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// Sorted, deduplicated.
    pub risks: Vec<RiskFlag>,
}

impl Classification {
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !self.risks.is_empty()
    }

    #[must_use]
    pub fn has_risk(&self, flag: RiskFlag) -> bool {
        self.risks.contains(&flag)
    }
}

/// The classification engine. Borrows an explicit config so tests can vary
/// thresholds without touching globals.
pub struct Classifier<'a> {
    config: &'a Config,
    bad_chars: Regex,
}

const APPLEDOUBLE_PREFIX: &str = "._";

impl<'a> Classifier<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        // Windows-invalid symbols plus ASCII control characters; both break
        // FAT-reading DAP firmwares. The pattern is fixed, so compilation
        // cannot fail at runtime.
        #[allow(clippy::expect_used)]
        let bad_chars =
            Regex::new("[<>:\"/\\\\|?*\\x00-\\x1f]").expect("bad-chars pattern is valid");
        Self { config, bad_chars }
    }

    /// Classify one entry. Deterministic: identical entry attributes always
    /// yield the identical classification.
    #[must_use]
    pub fn classify(&self, entry: &Entry) -> Classification {
        let verdict = self.verdict_for(entry);
        let mut risks = self.risks_for(entry, verdict);
        risks.sort_unstable();
        risks.dedup();
        Classification { verdict, risks }
    }

    fn verdict_for(&self, entry: &Entry) -> Verdict {
        // Symlinks and unreadable nodes are only reported, never deleted, so
        // none of the junk rules apply to them.
        if matches!(entry.kind, NodeKind::Symlink | NodeKind::Unreadable) {
            return Verdict::Keep(KeepReason::Unrecognized);
        }

        let name_lower = entry.file_name.to_lowercase();

        // Directories are removable only via known junk names. The file
        // rules below must never reach a directory: a junk verdict on one
        // deletes its whole subtree.
        if entry.is_dir() {
            if self.config.names.junk_dirs.contains(&name_lower) {
                return Verdict::RemoveJunk(JunkReason::JunkDirName);
            }
            return Verdict::Keep(KeepReason::Directory);
        }

        // Sidecar patterns outrank the extension allowlists: `._Song.mp3`
        // carries an audio extension but is AppleDouble metadata.
        if entry.file_name.starts_with(APPLEDOUBLE_PREFIX) {
            return Verdict::RemoveJunk(JunkReason::AppleDoubleSidecar);
        }
        if self.config.names.junk_files.contains(&name_lower) {
            return Verdict::RemoveJunk(JunkReason::JunkFileName);
        }

        if self.config.extensions.audio.contains(&entry.extension) {
            return Verdict::Keep(KeepReason::Audio);
        }
        if self.config.extensions.art.contains(&entry.extension) {
            return Verdict::Keep(KeepReason::CoverArt);
        }
        if self.config.extensions.junk.contains(&entry.extension) {
            return Verdict::RemoveJunk(JunkReason::JunkExtension);
        }

        Verdict::Keep(KeepReason::Unrecognized)
    }

    fn risks_for(&self, entry: &Entry, verdict: Verdict) -> Vec<RiskFlag> {
        let mut risks = Vec::new();
        let scan = &self.config.scan;

        if entry.depth > scan.max_depth {
            risks.push(RiskFlag::DeepNesting);
        }
        if entry.abs_path_len > scan.max_path_len {
            risks.push(RiskFlag::LongPath);
        }
        if entry.file_name.chars().count() > scan.max_file_name_len {
            risks.push(RiskFlag::LongFileName);
        }
        if entry.file_name.chars().any(|c| !(' '..='~').contains(&c)) {
            risks.push(RiskFlag::NonAscii);
        }
        if self.bad_chars.is_match(&entry.file_name) {
            risks.push(RiskFlag::ProblematicChar);
        }
        if entry.file_name != entry.file_name.trim() || entry.file_name.contains("  ") {
            risks.push(RiskFlag::SuspiciousWhitespace);
        }
        if entry.is_file() && entry.size_bytes == 0 {
            risks.push(RiskFlag::ZeroByte);
        }
        if verdict == Verdict::Keep(KeepReason::CoverArt) && !self.art_name_recognized(entry) {
            risks.push(RiskFlag::ArtNamingRisk);
        }
        if entry.is_file() && self.config.extensions.sidecar.contains(&entry.extension) {
            risks.push(RiskFlag::OptionalSidecar);
        }
        match entry.kind {
            NodeKind::Symlink => risks.push(RiskFlag::UnsupportedLinkType),
            NodeKind::Unreadable => risks.push(RiskFlag::UnreadableEntry),
            NodeKind::File | NodeKind::Dir => {}
        }

        risks
    }

    /// A cover image is recognized when its stem is one of the preferred
    /// names or at least mentions cover/folder, as most firmwares match on.
    fn art_name_recognized(&self, entry: &Entry) -> bool {
        let stem = entry.stem_lower();
        self.config.names.preferred_cover.contains(&stem)
            || stem.contains("cover")
            || stem.contains("folder")
    }
}
