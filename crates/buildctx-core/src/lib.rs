//! Core types for buildctx.
//!
//! This crate provides the pattern compiler, the per-scan pattern set,
//! the ignore-file line source and the result types shared by the scan
//! engine and the command-line tool.

mod collector;
mod config;
mod error;
mod ignore_file;
mod pattern;
mod pattern_set;
mod report;

pub use collector::ResultCollector;
pub use config::{DEFAULT_IGNORE_FILE, ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{CompileError, ScanError};
pub use ignore_file::{parse_ignore_lines, read_ignore_file};
pub use pattern::IgnorePattern;
pub use pattern_set::{PRUNED_DIR_NAMES, PatternSet};
pub use report::{ScanReport, ScanStats};
