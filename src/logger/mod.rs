//! Activity logging for scans and removals.

pub mod jsonl;
