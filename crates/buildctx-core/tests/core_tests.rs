use std::fs;
use std::path::{Path, PathBuf};

use buildctx_core::{
    CompileError, IgnorePattern, PRUNED_DIR_NAMES, PatternSet, ResultCollector, ScanConfig,
    ScanError, parse_ignore_lines,
};
use tempfile::TempDir;

fn root() -> PathBuf {
    PathBuf::from("/srv/app")
}

#[test]
fn test_literal_patterns_match_their_own_path() {
    for pattern in ["Dockerfile", "src/main.rs", "a/b/c/d.txt", "with space.txt"] {
        let compiled = IgnorePattern::compile(pattern, &root()).unwrap();
        let path = root().join(pattern);
        assert!(compiled.matches(&path, false), "{pattern} should match itself");
    }
}

#[test]
fn test_matcher_is_anchored_to_root() {
    let compiled = IgnorePattern::compile("secret.env", &root()).unwrap();
    assert!(compiled.matches(Path::new("/srv/app/secret.env"), false));
    assert!(!compiled.matches(Path::new("/srv/app/config/secret.env"), false));
    assert!(!compiled.matches(Path::new("/srv/other/secret.env"), false));
    assert!(!compiled.matches(Path::new("/srv/app/secret.env.bak"), false));
    assert!(compiled.expression().starts_with("(?s)^"));
    assert!(compiled.expression().ends_with('$'));
}

#[test]
fn test_compile_error_carries_pattern() {
    let err: CompileError = IgnorePattern::compile("[z-a]", &root()).unwrap_err();
    assert_eq!(err.pattern, "[z-a]");
    assert!(err.to_string().contains("[z-a]"));
}

#[test]
fn test_pattern_set_from_ignore_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".dockerignore"),
        "# Ignore build output\ntarget\n\n*.md\n!README.md\n",
    )
    .unwrap();

    let config = ScanConfig::new(temp.path());
    let set = PatternSet::discover(temp.path(), &config).unwrap();

    let raw: Vec<_> = set.patterns().iter().map(IgnorePattern::raw).collect();
    assert_eq!(raw, vec!["target", "*.md", "!README.md"]);
    assert_eq!(set.entry_count(), 3 + PRUNED_DIR_NAMES.len());
    assert_eq!(set.root(), temp.path());
}

#[test]
fn test_pattern_set_without_ignore_file() {
    let temp = TempDir::new().unwrap();
    let config = ScanConfig::new(temp.path());
    let set = PatternSet::discover(temp.path(), &config).unwrap();

    assert_eq!(set.pattern_count(), 0);
    assert_eq!(set.pruned_names(), &[".git", "vendor", "node_modules"]);
}

#[test]
fn test_pattern_set_bad_line_fails_discovery() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".dockerignore"), "ok\n[broken\n").unwrap();

    let config = ScanConfig::new(temp.path());
    let err = PatternSet::discover(temp.path(), &config).unwrap_err();
    assert!(matches!(err, ScanError::Compile(ref e) if e.pattern == "[broken"));
}

#[test]
fn test_parse_ignore_lines_preserves_order() {
    let lines = parse_ignore_lines("b\n# c\na\n\n!b/keep\n");
    assert_eq!(lines, vec!["b", "a", "!b/keep"]);
}

#[test]
fn test_collector_dedup() {
    let mut collector = ResultCollector::new();
    collector.insert("target/foo-runner.jar");
    collector.insert("target/foo-runner.jar");
    assert_eq!(collector.len(), 1);
    assert!(!collector.is_empty());
}

#[test]
fn test_config_builder_error() {
    let err = ScanConfig::builder().build().unwrap_err();
    assert!(err.to_string().contains("Root path is required"));
}
