#![forbid(unsafe_code)]

//! dapsweep — DAP compatibility scanner and library cleaner.
//!
//! Scans a directory tree holding a *copy* of a music library and finds what
//! confuses simple portable-audio-player (DAP) indexers:
//!
//! 1. **Junk** — sidecars, playlists, databases, logs; safe to delete
//! 2. **Risk flags** — deep nesting, long paths, non-ASCII names, zero-byte
//!    files, ambiguous album-art naming; report-only unless opted in
//!
//! Removal is dry-run by default, every deletion is independent, and a single
//! Apply pass is exhaustive: re-scanning afterwards reports zero junk.
//!
//! Deletions are permanent — run this against a copy of your data, for
//! example an SD card prepared exclusively for a DAP.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use dapsweep::prelude::*;
//!
//! # fn main() -> dapsweep::core::errors::Result<()> {
//! let config = Config::default();
//! let report = scan("/media/sdcard/Music", &config)?;
//! let executor = ActionExecutor::new(&config);
//! let outcome = executor.execute(&executor.plan(&report), ApplyMode::DryRun);
//! println!("{} item(s) would be removed", outcome.removed.len());
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod scanner;
