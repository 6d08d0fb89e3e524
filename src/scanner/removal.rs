//! Removal executor: dry-run-first deletion of junk findings.
//!
//! Pipeline: report -> plan (select junk + opted-in risk findings, prune
//! descendants of selected directories) -> execute (dry-run or apply).
//!
//! Each deletion is attempted independently; one failure never blocks the
//! rest. A junk directory is removed recursively in one operation, which is
//! what makes a single Apply pass exhaustive: re-scanning the resulting tree
//! reports zero removable junk.

#![allow(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::config::{Config, RemovalConfig};
use crate::core::errors::SweepError;
use crate::logger::jsonl::{EventType, JsonlLogger, LogEntry, Severity};
use crate::scanner::classify::{JunkReason, RiskFlag, Verdict};
use crate::scanner::report::Report;

/// Whether to mutate the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Report what would be removed; touch nothing.
    DryRun,
    /// Actually delete.
    Apply,
}

impl ApplyMode {
    /// Effective mode for a configuration: dry-run unless explicitly
    /// disabled via `removal.dry_run = false` (or its env override).
    #[must_use]
    pub const fn from_config(removal: &RemovalConfig) -> Self {
        if removal.dry_run {
            Self::DryRun
        } else {
            Self::Apply
        }
    }
}

/// Why a path was selected for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    Junk(JunkReason),
    /// Risk-flag category the caller opted into removing.
    OptIn(RiskFlag),
}

/// One path selected for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalTarget {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub cause: RemovalCause,
}

/// Selected targets, in walk order, descendants of selected directories
/// already pruned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalPlan {
    /// Library root the plan was built for.
    pub root: PathBuf,
    pub targets: Vec<RemovalTarget>,
    pub total_bytes: u64,
}

/// A single removal failure, with the OS-level reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub reason: String,
    pub code: String,
}

/// Result of executing a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Paths removed — or, in dry-run, paths that would be removed.
    pub removed: Vec<PathBuf>,
    pub failed: Vec<RemovalFailure>,
    pub bytes_freed: u64,
    pub dry_run: bool,
    pub duration: Duration,
}

/// Executes removal plans against the library tree.
pub struct ActionExecutor<'a> {
    config: &'a Config,
    logger: Option<&'a JsonlLogger>,
}

impl<'a> ActionExecutor<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            logger: None,
        }
    }

    /// Attach an activity logger.
    #[must_use]
    pub fn with_logger(mut self, logger: &'a JsonlLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Select removable findings from a report.
    ///
    /// Every `RemoveJunk` finding is selected. Risk-flagged findings join
    /// only when their category is opted in via config, and only for regular
    /// files. Findings under an already-selected directory are pruned —
    /// recursive removal of the ancestor covers them.
    #[must_use]
    pub fn plan(&self, report: &Report) -> RemovalPlan {
        let mut targets: Vec<RemovalTarget> = Vec::new();
        let mut selected_dirs: Vec<PathBuf> = Vec::new();

        for finding in &report.findings {
            let entry = &finding.entry;
            if selected_dirs.iter().any(|dir| entry.abs_path.starts_with(dir)) {
                continue;
            }

            let cause = match finding.classification.verdict {
                Verdict::RemoveJunk(reason) => Some(RemovalCause::Junk(reason)),
                Verdict::Keep(_) => self.opt_in_cause(finding),
            };
            let Some(cause) = cause else { continue };

            if entry.is_dir() {
                selected_dirs.push(entry.abs_path.clone());
            }
            targets.push(RemovalTarget {
                path: entry.abs_path.clone(),
                is_dir: entry.is_dir(),
                size_bytes: entry.size_bytes,
                cause,
            });
        }

        let total_bytes = targets.iter().map(|t| t.size_bytes).sum();
        RemovalPlan {
            root: report.root.clone(),
            targets,
            total_bytes,
        }
    }

    fn opt_in_cause(&self, finding: &crate::scanner::report::Finding) -> Option<RemovalCause> {
        if !finding.entry.is_file() {
            return None;
        }
        let removal = &self.config.removal;
        if removal.remove_zero_byte && finding.classification.has_risk(RiskFlag::ZeroByte) {
            return Some(RemovalCause::OptIn(RiskFlag::ZeroByte));
        }
        if removal.remove_optional_sidecars
            && finding.classification.has_risk(RiskFlag::OptionalSidecar)
        {
            return Some(RemovalCause::OptIn(RiskFlag::OptionalSidecar));
        }
        None
    }

    /// Execute a plan. `DryRun` performs no filesystem mutation at all.
    #[must_use]
    pub fn execute(&self, plan: &RemovalPlan, mode: ApplyMode) -> ActionOutcome {
        let start = Instant::now();
        let dry_run = mode == ApplyMode::DryRun;
        let mut outcome = ActionOutcome {
            removed: Vec::new(),
            failed: Vec::new(),
            bytes_freed: 0,
            dry_run,
            duration: Duration::ZERO,
        };

        for target in &plan.targets {
            if dry_run {
                outcome.removed.push(target.path.clone());
                outcome.bytes_freed += target.size_bytes;
                continue;
            }

            match Self::delete(target) {
                Ok(()) => {
                    outcome.removed.push(target.path.clone());
                    outcome.bytes_freed += target.size_bytes;
                    self.log(
                        LogEntry::new(EventType::JunkRemoved, Severity::Info)
                            .with_path(target.path.to_string_lossy())
                            .with_size(target.size_bytes),
                    );
                }
                Err(err) => {
                    self.log(
                        LogEntry::new(EventType::RemovalFailed, Severity::Warning)
                            .with_path(target.path.to_string_lossy())
                            .with_error(err.code(), err.to_string()),
                    );
                    outcome.failed.push(RemovalFailure {
                        path: target.path.clone(),
                        reason: err.to_string(),
                        code: err.code().to_string(),
                    });
                }
            }
        }

        if !dry_run && self.config.removal.remove_empty_dirs {
            self.sweep_empty_dirs(&plan.root, true, &mut outcome);
        }

        outcome.duration = start.elapsed();
        let summary_event = if dry_run {
            EventType::DryRunCompleted
        } else {
            EventType::ApplyCompleted
        };
        self.log(
            LogEntry::new(summary_event, Severity::Info)
                .with_count(outcome.removed.len())
                .with_size(outcome.bytes_freed),
        );
        outcome
    }

    /// Deepest-first removal of directories left empty by the main pass.
    /// Returns whether `dir` ended up removed. The root itself always stays;
    /// listing failures leave the directory alone.
    fn sweep_empty_dirs(&self, dir: &Path, is_root: bool, outcome: &mut ActionOutcome) -> bool {
        let Ok(listing) = fs::read_dir(dir) else {
            return false;
        };

        let mut occupied = false;
        for dirent in listing.flatten() {
            let descends = dirent.file_type().is_ok_and(|t| t.is_dir());
            if descends && self.sweep_empty_dirs(&dirent.path(), false, outcome) {
                continue;
            }
            occupied = true;
        }
        if occupied || is_root {
            return false;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                outcome.removed.push(dir.to_path_buf());
                self.log(
                    LogEntry::new(EventType::JunkRemoved, Severity::Info)
                        .with_path(dir.to_string_lossy()),
                );
                true
            }
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                let err = SweepError::io(dir, err);
                self.log(
                    LogEntry::new(EventType::RemovalFailed, Severity::Warning)
                        .with_path(dir.to_string_lossy())
                        .with_error(err.code(), err.to_string()),
                );
                outcome.failed.push(RemovalFailure {
                    path: dir.to_path_buf(),
                    reason: err.to_string(),
                    code: err.code().to_string(),
                });
                false
            }
        }
    }

    fn delete(target: &RemovalTarget) -> crate::core::errors::Result<()> {
        let result = if target.is_dir {
            fs::remove_dir_all(&target.path)
        } else {
            fs::remove_file(&target.path)
        };
        match result {
            Ok(()) => Ok(()),
            // Already gone (raced with another cleaner): the goal state holds.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SweepError::io(&target.path, err)),
        }
    }

    fn log(&self, entry: LogEntry) {
        if let Some(logger) = self.logger {
            logger.append(&entry);
        }
    }
}
