//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Entries evaluated so far.
    pub entries_visited: u64,
    /// Paths accepted into the context so far.
    pub included: u64,
    /// Entries excluded so far.
    pub excluded: u64,
    /// Entry most recently evaluated.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
    /// Set on the final update of a scan.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            entries_visited: 0,
            included: 0,
            excluded: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Calculate scan rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.entries_visited as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_without_elapsed_time() {
        let progress = ScanProgress {
            entries_visited: 10,
            ..ScanProgress::new()
        };
        assert_eq!(progress.entries_per_second(), 0.0);
    }

    #[test]
    fn test_rate() {
        let progress = ScanProgress {
            entries_visited: 500,
            elapsed: Duration::from_secs(2),
            ..ScanProgress::new()
        };
        assert_eq!(progress.entries_per_second(), 250.0);
    }
}
