//! Per-scan resolution state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use buildctx_core::{PatternSet, ResultCollector, ScanStats};

/// Outcome of evaluating one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No pattern excluded the entry.
    Included,
    /// The entry was excluded and nothing re-included it.
    Excluded,
    /// The entry was excluded, but a negated pattern matched it.
    Reincluded,
    /// The scan root itself; never evaluated or emitted.
    Root,
}

/// Mutable state for a single resolution pass.
///
/// A context is created per scan and dropped with it, so independent
/// scans never share excluded directories or results.
#[derive(Debug)]
pub struct ScanContext<'a> {
    patterns: &'a PatternSet,
    excluded_dirs: HashSet<PathBuf>,
    collector: ResultCollector,
    stats: ScanStats,
}

impl<'a> ScanContext<'a> {
    /// Start a scan over the root of `patterns`.
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self {
            patterns,
            excluded_dirs: HashSet::new(),
            collector: ResultCollector::new(),
            stats: ScanStats::new(),
        }
    }

    /// Evaluate a visited entry and record it if it belongs in the context.
    ///
    /// Entries must be visited parent-first. Every pattern is applied; a
    /// match by any negated pattern re-includes the entry regardless of
    /// where that pattern sits relative to the excluding ones.
    pub fn visit(&mut self, path: &Path, is_dir: bool) -> Decision {
        let patterns = self.patterns;
        let root = patterns.root();
        if path == root {
            return Decision::Root;
        }
        self.stats.record_visit();

        let parent_excluded = path
            .parent()
            .is_some_and(|parent| self.excluded_dirs.contains(parent));

        let mut excluded = false;
        let mut reincluded = false;

        for pattern in patterns.patterns() {
            if !pattern.is_negated() && parent_excluded {
                excluded = true;
                continue;
            }
            if !pattern.matches(path, is_dir) {
                continue;
            }

            excluded = true;
            if pattern.is_negated() {
                reincluded = true;
                self.collector.insert(relative(root, path));
            }
            if is_dir {
                self.excluded_dirs.insert(path.to_path_buf());
            }
        }

        if excluded {
            self.stats.record_excluded(reincluded);
            if reincluded {
                Decision::Reincluded
            } else {
                Decision::Excluded
            }
        } else {
            self.stats.record_included();
            self.collector.insert(relative(root, path));
            Decision::Included
        }
    }

    /// Record directories that were skipped without being walked.
    pub fn record_pruned(&mut self, count: u64) {
        self.stats.record_pruned(count);
    }

    /// Statistics so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Number of paths collected so far.
    pub fn included_len(&self) -> usize {
        self.collector.len()
    }

    /// Finish the scan, returning included paths in walk order.
    pub fn finish(self) -> (Vec<String>, ScanStats) {
        (self.collector.into_vec(), self.stats)
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(lines: &[&str]) -> PatternSet {
        PatternSet::load("/ctx", lines).unwrap()
    }

    fn p(rel: &str) -> PathBuf {
        Path::new("/ctx").join(rel)
    }

    #[test]
    fn test_root_is_never_emitted() {
        let patterns = set(&[]);
        let mut ctx = ScanContext::new(&patterns);
        assert_eq!(ctx.visit(Path::new("/ctx"), true), Decision::Root);
        let (included, stats) = ctx.finish();
        assert!(included.is_empty());
        assert_eq!(stats.entries_visited, 0);
    }

    #[test]
    fn test_unmatched_entries_are_included() {
        let patterns = set(&["*.log"]);
        let mut ctx = ScanContext::new(&patterns);
        assert_eq!(ctx.visit(&p("src"), true), Decision::Included);
        assert_eq!(ctx.visit(&p("src/main.rs"), false), Decision::Included);
        assert_eq!(ctx.visit(&p("debug.log"), false), Decision::Excluded);

        let (included, _) = ctx.finish();
        assert_eq!(included, vec!["src", "src/main.rs"]);
    }

    #[test]
    fn test_negation_overrides_regardless_of_order() {
        // The negation comes first, yet still wins over the later exclude.
        let patterns = set(&["!README.md", "*.md"]);
        let mut ctx = ScanContext::new(&patterns);
        assert_eq!(ctx.visit(&p("README.md"), false), Decision::Reincluded);
        assert_eq!(ctx.visit(&p("CHANGES.md"), false), Decision::Excluded);

        let (included, stats) = ctx.finish();
        assert_eq!(included, vec!["README.md"]);
        assert_eq!(stats.reincluded, 1);
    }

    #[test]
    fn test_children_inherit_exclusion_one_level() {
        let patterns = set(&["target"]);
        let mut ctx = ScanContext::new(&patterns);
        assert_eq!(ctx.visit(&p("target"), true), Decision::Excluded);
        assert_eq!(ctx.visit(&p("target/app.jar"), false), Decision::Excluded);
        assert_eq!(ctx.visit(&p("target/lib"), true), Decision::Excluded);
        // target/lib matched nothing itself, so it is not an excluded dir.
        assert_eq!(ctx.visit(&p("target/lib/one.jar"), false), Decision::Included);
    }

    #[test]
    fn test_negated_descendant_of_excluded_dir() {
        let patterns = set(&["target", "!target/*-runner.jar"]);
        let mut ctx = ScanContext::new(&patterns);
        ctx.visit(&p("target"), true);
        assert_eq!(
            ctx.visit(&p("target/foo-runner.jar"), false),
            Decision::Reincluded
        );
        assert_eq!(ctx.visit(&p("target/foo.jar"), false), Decision::Excluded);

        let (included, _) = ctx.finish();
        assert_eq!(included, vec!["target/foo-runner.jar"]);
    }

    #[test]
    fn test_repeated_reinclusion_is_deduplicated() {
        let patterns = set(&["*", "!keep*", "!*.txt"]);
        let mut ctx = ScanContext::new(&patterns);
        assert_eq!(ctx.visit(&p("keep.txt"), false), Decision::Reincluded);
        assert_eq!(ctx.included_len(), 1);
    }

    #[test]
    fn test_no_patterns_includes_everything() {
        let patterns = set(&[]);
        let mut ctx = ScanContext::new(&patterns);
        ctx.visit(&p("a"), true);
        ctx.visit(&p("a/b"), false);
        assert_eq!(ctx.stats().included, 2);
        assert_eq!(ctx.stats().excluded, 0);
    }
}
