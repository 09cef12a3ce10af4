//! Ordered pattern collections for a single scan.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{CompileError, ScanError};
use crate::ignore_file::read_ignore_file;
use crate::pattern::IgnorePattern;

/// Directory names that are never walked, whatever the ignore file says.
pub const PRUNED_DIR_NAMES: [&str; 3] = [".git", "vendor", "node_modules"];

/// The compiled ignore rules for one scan root, in declaration order.
#[derive(Debug, Clone)]
pub struct PatternSet {
    root: PathBuf,
    patterns: Vec<IgnorePattern>,
}

impl PatternSet {
    /// A set with no compiled patterns; only the fixed pruned names apply.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: Vec::new(),
        }
    }

    /// Compile `lines` in order for a scan rooted at `root`.
    ///
    /// Lines must already be free of blanks and comments. The first line
    /// that fails to compile aborts the whole load.
    pub fn load<I, S>(root: impl Into<PathBuf>, lines: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root.into();
        let patterns = lines
            .into_iter()
            .map(|line| IgnorePattern::compile(line.as_ref(), &root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { root, patterns })
    }

    /// Build the set for `root` from the configured ignore file and any
    /// extra patterns.
    ///
    /// A missing ignore file is not an error; an unreadable one is.
    pub fn discover(root: &Path, config: &ScanConfig) -> Result<Self, ScanError> {
        let ignore_path = config.ignore_file_in(root);
        let mut lines = match read_ignore_file(&ignore_path)? {
            Some(lines) => {
                tracing::debug!(path = %ignore_path.display(), count = lines.len(), "loaded ignore file");
                lines
            }
            None => {
                tracing::debug!(path = %ignore_path.display(), "no ignore file, using defaults");
                Vec::new()
            }
        };
        lines.extend(config.extra_patterns.iter().cloned());

        Ok(Self::load(root, lines)?)
    }

    /// The scan root the patterns are anchored to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compiled patterns in declaration order.
    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of rules in effect, counting the fixed pruned names.
    pub fn entry_count(&self) -> usize {
        self.patterns.len() + PRUNED_DIR_NAMES.len()
    }

    /// The fixed directory names pruned from every walk.
    pub fn pruned_names(&self) -> &'static [&'static str] {
        &PRUNED_DIR_NAMES
    }

    /// Whether any pattern re-includes paths.
    pub fn has_negations(&self) -> bool {
        self.patterns.iter().any(IgnorePattern::is_negated)
    }

    /// Whether a directory basename is one of the fixed pruned names.
    pub fn is_pruned_name(name: &OsStr) -> bool {
        PRUNED_DIR_NAMES.iter().any(|pruned| name == OsStr::new(pruned))
    }

    /// Whether any non-negated pattern matches the entry directly.
    pub fn excludes(&self, path: &Path, is_dir: bool) -> bool {
        self.patterns
            .iter()
            .any(|p| !p.is_negated() && p.matches(path, is_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_preserves_order() {
        let set = PatternSet::load("/ctx", ["lib", "*.md", "!README.md"]).unwrap();
        let raw: Vec<_> = set.patterns().iter().map(IgnorePattern::raw).collect();
        assert_eq!(raw, vec!["lib", "*.md", "!README.md"]);
        assert!(set.has_negations());
    }

    #[test]
    fn test_entry_count_includes_fixed_names() {
        let set = PatternSet::load(
            "/ctx",
            ["lib", "*.md", "!README.md", "temp?", "target", "!target/*-runner.jar"],
        )
        .unwrap();
        assert_eq!(set.pattern_count(), 6);
        assert_eq!(set.entry_count(), 9);

        let empty = PatternSet::empty("/ctx");
        assert_eq!(empty.pattern_count(), 0);
        assert_eq!(empty.entry_count(), 3);
        assert!(!empty.has_negations());
    }

    #[test]
    fn test_load_aborts_on_bad_pattern() {
        let err = PatternSet::load("/ctx", ["ok", "bad[", "also-ok"]).unwrap_err();
        assert_eq!(err.pattern, "bad[");
    }

    #[test]
    fn test_pruned_names() {
        assert!(PatternSet::is_pruned_name(OsStr::new(".git")));
        assert!(PatternSet::is_pruned_name(OsStr::new("vendor")));
        assert!(PatternSet::is_pruned_name(OsStr::new("node_modules")));
        assert!(!PatternSet::is_pruned_name(OsStr::new("vendors")));
        assert!(!PatternSet::is_pruned_name(OsStr::new(".github")));
    }

    #[test]
    fn test_dir_star_excludes_contained_files() {
        let set = PatternSet::load("/ctx", ["lib/*"]).unwrap();
        assert!(set.excludes(Path::new("/ctx/lib/a.txt"), false));
        assert!(set.excludes(Path::new("/ctx/lib"), true));
        assert!(!set.excludes(Path::new("/ctx/lib"), false));
    }

    #[test]
    fn test_excludes_ignores_negations() {
        let set = PatternSet::load("/ctx", ["!keep", "drop"]).unwrap();
        assert!(set.excludes(Path::new("/ctx/drop"), false));
        assert!(!set.excludes(Path::new("/ctx/keep"), false));
    }
}
