//! Report aggregation: grouped findings plus summary tallies.
//!
//! Pure accumulation over `(Entry, Classification)` pairs. Insertion order is
//! preserved and all tallies use `BTreeMap`, so serialized reports diff
//! cleanly between runs.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::scanner::classify::{Classification, JunkReason, RiskFlag};
use crate::scanner::entry::Entry;

/// One classified entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub entry: Entry,
    pub classification: Classification,
}

/// Summary counts over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total entries walked.
    pub scanned: usize,
    /// Entries with a `Keep` verdict.
    pub kept: usize,
    /// Entries with a `RemoveJunk` verdict.
    pub junk: usize,
    /// Entries carrying at least one risk flag.
    pub flagged: usize,
    pub junk_counts: BTreeMap<JunkReason, usize>,
    pub risk_counts: BTreeMap<RiskFlag, usize>,
}

/// Aggregate result of one scan. Read-only after aggregation completes;
/// plain structured data for an external formatter to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub root: PathBuf,
    pub generated_at: DateTime<Utc>,
    /// Walk order, preserved.
    pub findings: Vec<Finding>,
    pub summary: ReportSummary,
}

impl Report {
    /// Findings with a `RemoveJunk` verdict, in walk order.
    pub fn junk_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.classification.verdict.is_junk())
    }

    /// Findings carrying at least one risk flag, in walk order.
    pub fn flagged_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.classification.is_flagged())
    }

    /// Serialize the full report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Collects classified entries into a [`Report`].
#[derive(Debug)]
pub struct ReportAggregator {
    root: PathBuf,
    findings: Vec<Finding>,
}

impl ReportAggregator {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            findings: Vec::new(),
        }
    }

    /// Record one classified entry. Order of calls is the order reported.
    pub fn record(&mut self, entry: Entry, classification: Classification) {
        self.findings.push(Finding {
            entry,
            classification,
        });
    }

    /// Finish aggregation and compute summary tallies.
    #[must_use]
    pub fn finish(self) -> Report {
        let mut summary = ReportSummary {
            scanned: self.findings.len(),
            ..ReportSummary::default()
        };
        for finding in &self.findings {
            match finding.classification.verdict {
                crate::scanner::classify::Verdict::Keep(_) => summary.kept += 1,
                crate::scanner::classify::Verdict::RemoveJunk(reason) => {
                    summary.junk += 1;
                    *summary.junk_counts.entry(reason).or_insert(0) += 1;
                }
            }
            if finding.classification.is_flagged() {
                summary.flagged += 1;
            }
            for risk in &finding.classification.risks {
                *summary.risk_counts.entry(*risk).or_insert(0) += 1;
            }
        }

        Report {
            root: self.root,
            generated_at: Utc::now(),
            findings: self.findings,
            summary,
        }
    }
}
