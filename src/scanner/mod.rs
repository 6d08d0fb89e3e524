//! Library sweep engine: walker, classifier, report aggregation, removal.

pub mod classify;
pub mod entry;
pub mod removal;
pub mod report;
pub mod walker;

use std::path::Path;

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::scanner::classify::Classifier;
use crate::scanner::report::{Report, ReportAggregator};
use crate::scanner::walker::TreeWalker;

/// Walk `root`, classify every entry, and aggregate a report.
///
/// The one-call form of the pipeline; the pieces stay independently usable
/// for callers that want to stream entries or classify synthetic ones.
pub fn scan(root: impl AsRef<Path>, config: &Config) -> Result<Report> {
    let root = root.as_ref();
    let classifier = Classifier::new(config);
    let mut aggregator = ReportAggregator::new(root);
    for entry in TreeWalker::new(root)? {
        let classification = classifier.classify(&entry);
        aggregator.record(entry, classification);
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scan_runs_the_full_pipeline() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Song.mp3"), b"music").unwrap();
        fs::write(tmp.path().join(".DS_Store"), b"junk").unwrap();

        let config = Config::default();
        let report = scan(tmp.path(), &config).unwrap();
        assert_eq!(report.summary.scanned, 2);
        assert_eq!(report.summary.kept, 1);
        assert_eq!(report.summary.junk, 1);
        assert_eq!(report.root, tmp.path());
    }

    #[test]
    fn scan_propagates_invalid_root() {
        let config = Config::default();
        let err = scan("/definitely/does/not/exist", &config).unwrap_err();
        assert_eq!(err.code(), "DAP-2001");
    }
}
