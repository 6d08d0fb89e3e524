//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use dapsweep::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SweepError};

// Scanner
pub use crate::scanner::classify::{
    Classification, Classifier, JunkReason, KeepReason, RiskFlag, Verdict,
};
pub use crate::scanner::entry::{Entry, NodeKind};
pub use crate::scanner::removal::{ActionExecutor, ActionOutcome, ApplyMode, RemovalPlan};
pub use crate::scanner::report::{Finding, Report, ReportAggregator};
pub use crate::scanner::scan;
pub use crate::scanner::walker::TreeWalker;

// Logging
pub use crate::logger::jsonl::{JsonlLogger, LogEntry};
