//! Build context resolution engine for buildctx.
//!
//! This crate walks a directory tree and decides, entry by entry, which
//! paths survive the root's ignore file.
//!
//! # Overview
//!
//! `buildctx-scan` drives the walk and applies the rules compiled by
//! `buildctx-core`:
//!
//! - **Deterministic traversal** via a serial, sorted jwalk walk
//! - **Negation overrides**: any matching `!pattern` re-includes a path,
//!   even beneath an excluded directory
//! - **Fixed pruning** of `.git`, `vendor` and `node_modules`
//! - **Progress updates** via broadcast channels
//! - **Cancellation** between entries
//!
//! # Example
//!
//! ```rust,no_run
//! use buildctx_scan::{ContextScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/app");
//! let report = ContextScanner::new().scan(&config).unwrap();
//!
//! for path in &report.included {
//!     println!("{path}");
//! }
//! ```
//!
//! # Explicit patterns
//!
//! ```rust,no_run
//! use buildctx_scan::{ContextScanner, PatternSet};
//!
//! let patterns = PatternSet::load("/abs/app", ["target", "!target/*-runner.jar"]).unwrap();
//! let included = ContextScanner::new().scan_patterns(&patterns).unwrap();
//! ```

mod context;
mod progress;
mod scanner;

pub use context::{Decision, ScanContext};
pub use progress::ScanProgress;
pub use scanner::ContextScanner;

// Re-export core types for convenience
pub use buildctx_core::{
    CompileError, IgnorePattern, PRUNED_DIR_NAMES, PatternSet, ScanConfig, ScanError, ScanReport,
    ScanStats,
};
pub use tokio_util::sync::CancellationToken;
