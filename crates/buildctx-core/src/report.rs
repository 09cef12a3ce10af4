//! Scan results and statistics.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary statistics for a resolved build context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Entries evaluated against the pattern set (root excluded).
    pub entries_visited: u64,
    /// Entries that no pattern excluded.
    pub included: u64,
    /// Entries excluded by a pattern or by their parent directory.
    pub excluded: u64,
    /// Excluded entries brought back by a negated pattern.
    pub reincluded: u64,
    /// Directories skipped without being walked.
    pub pruned_dirs: u64,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited entry.
    pub fn record_visit(&mut self) {
        self.entries_visited += 1;
    }

    /// Record an entry kept by default.
    pub fn record_included(&mut self) {
        self.included += 1;
    }

    /// Record an excluded entry, noting whether a negation re-included it.
    pub fn record_excluded(&mut self, reincluded: bool) {
        self.excluded += 1;
        if reincluded {
            self.reincluded += 1;
        }
    }

    /// Record directories that were not descended into.
    pub fn record_pruned(&mut self, count: u64) {
        self.pruned_dirs += count;
    }
}

/// The resolved build context for one root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Canonical root of the scan.
    pub root: PathBuf,
    /// Root-relative included paths, in walk order.
    pub included: Vec<String>,
    /// Scan statistics.
    pub stats: ScanStats,
    /// Time taken to scan.
    pub scan_duration: Duration,
}

impl ScanReport {
    /// Number of included paths.
    pub fn len(&self) -> usize {
        self.included.len()
    }

    /// Check if nothing was included.
    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }

    /// Check whether a root-relative path was included.
    pub fn contains(&self, path: &str) -> bool {
        self.included.iter().any(|p| p == path)
    }
}
