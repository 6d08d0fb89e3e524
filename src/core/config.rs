//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};

/// Full dapsweep configuration model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub extensions: ExtensionConfig,
    pub names: NameConfig,
    pub removal: RemovalConfig,
}

/// Path and filename health thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth below the library root before flagging.
    pub max_depth: usize,
    /// Maximum absolute path length in characters before flagging.
    pub max_path_len: usize,
    /// Maximum file name length in characters before flagging.
    pub max_file_name_len: usize,
}

/// Extension sets, stored lowercase without the leading dot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Audio formats DAP firmwares index.
    pub audio: BTreeSet<String>,
    /// Album-art image formats.
    pub art: BTreeSet<String>,
    /// Playlist/db/log/editor clutter that is safe to delete.
    pub junk: BTreeSet<String>,
    /// Optional sidecars some devices ignore and some choke on.
    pub sidecar: BTreeSet<String>,
}

/// Well-known junk names and preferred cover-art stems, matched lowercase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NameConfig {
    pub junk_files: BTreeSet<String>,
    pub junk_dirs: BTreeSet<String>,
    pub preferred_cover: BTreeSet<String>,
}

/// Removal behavior. Defaults make a first run safe: dry-run on, no opt-ins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemovalConfig {
    pub dry_run: bool,
    /// Also remove zero-byte regular files (risk-flag opt-in).
    pub remove_zero_byte: bool,
    /// Also remove optional sidecars such as .cue/.nfo/.txt (risk-flag opt-in).
    pub remove_optional_sidecars: bool,
    /// After deletion, also remove directories left empty (deepest first).
    pub remove_empty_dirs: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_path_len: 150,
            max_file_name_len: 120,
        }
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            audio: to_set(&[
                "flac", "mp3", "wav", "aac", "m4a", "ogg", "opus", "wma", "ape", "aiff",
            ]),
            // jpg is safest; png sometimes works but can be slow on some DAPs.
            art: to_set(&["jpg", "jpeg", "png", "bmp", "webp"]),
            junk: to_set(&[
                "m3u", "m3u8", "pls", "wpl", "xspf", "db", "ini", "log", "tmp", "bak", "sfk",
                "asd", "pkf", "xml", "json", "plist",
            ]),
            sidecar: to_set(&["cue", "nfo", "txt", "rtf", "pdf", "md"]),
        }
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            junk_files: to_set(&[".ds_store", "thumbs.db", "desktop.ini"]),
            junk_dirs: to_set(&["__macosx", ".trashes", ".spotlight-v100"]),
            preferred_cover: to_set(&["cover", "folder", "front", "album"]),
        }
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            remove_zero_byte: false,
            remove_optional_sidecars: false,
            remove_empty_dirs: false,
        }
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Config {
    /// Default configuration path (`~/.config/dapsweep/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home_dir.join(".config").join("dapsweep").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default path;
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SweepError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(SweepError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides()?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_usize("DAPSWEEP_SCAN_MAX_DEPTH", &mut self.scan.max_depth)?;
        set_env_usize("DAPSWEEP_SCAN_MAX_PATH_LEN", &mut self.scan.max_path_len)?;
        set_env_usize(
            "DAPSWEEP_SCAN_MAX_FILE_NAME_LEN",
            &mut self.scan.max_file_name_len,
        )?;
        set_env_bool("DAPSWEEP_REMOVAL_DRY_RUN", &mut self.removal.dry_run)?;
        set_env_bool(
            "DAPSWEEP_REMOVAL_REMOVE_ZERO_BYTE",
            &mut self.removal.remove_zero_byte,
        )?;
        set_env_bool(
            "DAPSWEEP_REMOVAL_REMOVE_OPTIONAL_SIDECARS",
            &mut self.removal.remove_optional_sidecars,
        )?;
        set_env_bool(
            "DAPSWEEP_REMOVAL_REMOVE_EMPTY_DIRS",
            &mut self.removal.remove_empty_dirs,
        )?;
        Ok(())
    }

    /// Normalize sets for consistent matching: extensions lose any leading dot
    /// and everything compares lowercase.
    fn normalize(&mut self) {
        for set in [
            &mut self.extensions.audio,
            &mut self.extensions.art,
            &mut self.extensions.junk,
            &mut self.extensions.sidecar,
        ] {
            let normalized: BTreeSet<String> = set
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect();
            *set = normalized;
        }
        for set in [
            &mut self.names.junk_files,
            &mut self.names.junk_dirs,
            &mut self.names.preferred_cover,
        ] {
            let normalized: BTreeSet<String> = set.iter().map(|n| n.to_lowercase()).collect();
            *set = normalized;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(SweepError::InvalidConfig {
                details: "scan.max_depth must be >= 1".to_string(),
            });
        }
        if self.scan.max_path_len == 0 || self.scan.max_file_name_len == 0 {
            return Err(SweepError::InvalidConfig {
                details: "scan.max_path_len and scan.max_file_name_len must be >= 1".to_string(),
            });
        }
        if self.extensions.audio.is_empty() {
            return Err(SweepError::InvalidConfig {
                details: "extensions.audio must not be empty".to_string(),
            });
        }
        // An extension claimed by both the keep and junk sides would make the
        // verdict depend on rule order alone; reject it outright.
        for (other_name, other) in [
            ("art", &self.extensions.art),
            ("junk", &self.extensions.junk),
            ("sidecar", &self.extensions.sidecar),
        ] {
            if let Some(dup) = self.extensions.audio.intersection(other).next() {
                return Err(SweepError::InvalidConfig {
                    details: format!(
                        "extension '{dup}' appears in both extensions.audio and extensions.{other_name}"
                    ),
                });
            }
        }
        if let Some(dup) = self
            .extensions
            .junk
            .intersection(&self.extensions.art)
            .next()
        {
            return Err(SweepError::InvalidConfig {
                details: format!(
                    "extension '{dup}' appears in both extensions.junk and extensions.art"
                ),
            });
        }
        Ok(())
    }
}

fn set_env_usize(key: &str, target: &mut usize) -> Result<()> {
    if let Ok(raw) = env::var(key) {
        *target = raw.trim().parse().map_err(|_| SweepError::InvalidConfig {
            details: format!("{key} must be a non-negative integer, got '{raw}'"),
        })?;
    }
    Ok(())
}

fn set_env_bool(key: &str, target: &mut bool) -> Result<()> {
    if let Ok(raw) = env::var(key) {
        *target = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(SweepError::InvalidConfig {
                    details: format!("{key} must be a boolean, got '{raw}'"),
                });
            }
        };
    }
    Ok(())
}
