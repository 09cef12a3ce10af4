//! JWalk-based build context resolver.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use buildctx_core::{PatternSet, ScanConfig, ScanError, ScanReport};

use crate::context::ScanContext;
use crate::progress::ScanProgress;

/// Entries between two progress updates.
const PROGRESS_INTERVAL: u64 = 1000;

/// Resolves which paths under a root belong in the build context.
///
/// The walk is serial and depth-first with siblings in file-name order,
/// so results are deterministic for an unchanged tree.
pub struct ContextScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl ContextScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Resolve the build context described by `config`.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanReport, ScanError> {
        self.scan_with_cancel(config, &CancellationToken::new())
    }

    /// Resolve the build context, stopping early if `cancel` fires.
    ///
    /// Cancellation is checked between entries and yields
    /// [`ScanError::Interrupted`]; no partial result is returned.
    pub fn scan_with_cancel(
        &self,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;
        ensure_directory(&root)?;

        let patterns = PatternSet::discover(&root, config)?;
        self.walk(&patterns, config.fast_prune, cancel)
    }

    /// Resolve a context from an already loaded pattern set.
    ///
    /// The walk starts at the set's root, which must be the same absolute
    /// path the patterns were compiled against.
    pub fn scan_patterns(&self, patterns: &PatternSet) -> Result<Vec<String>, ScanError> {
        ensure_directory(patterns.root())?;
        let report = self.walk(patterns, false, &CancellationToken::new())?;
        Ok(report.included)
    }

    fn walk(
        &self,
        patterns: &PatternSet,
        fast_prune: bool,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let root = patterns.root().to_path_buf();

        let fast_prune = fast_prune && !patterns.has_negations();
        tracing::debug!(
            root = %root.display(),
            patterns = patterns.pattern_count(),
            fast_prune,
            "starting context scan"
        );

        let mut ctx = ScanContext::new(patterns);

        // A root that is itself a pruned directory contributes nothing.
        if root.file_name().is_some_and(PatternSet::is_pruned_name) {
            tracing::debug!(root = %root.display(), "scan root is a pruned directory");
            ctx.record_pruned(1);
            return Ok(self.finish(ctx, root, start));
        }

        let pruned = Arc::new(AtomicU64::new(0));
        let walker = build_walker(&root, patterns, fast_prune, Arc::clone(&pruned));

        for entry_result in walker {
            if cancel.is_cancelled() {
                tracing::debug!(root = %root.display(), "context scan cancelled");
                return Err(ScanError::Interrupted);
            }

            let entry = entry_result.map_err(|err| walk_error(&root, err))?;
            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let decision = ctx.visit(&path, entry.file_type().is_dir());
            tracing::trace!(path = %path.display(), ?decision, "resolved entry");

            let visited = ctx.stats().entries_visited;
            if visited % PROGRESS_INTERVAL == 0 {
                self.send_progress(&ctx, path, start, false);
            }
        }

        ctx.record_pruned(pruned.load(Ordering::Relaxed));
        Ok(self.finish(ctx, root, start))
    }

    fn finish(&self, ctx: ScanContext<'_>, root: PathBuf, start: Instant) -> ScanReport {
        self.send_progress(&ctx, root.clone(), start, true);

        let (included, stats) = ctx.finish();
        let scan_duration = start.elapsed();

        tracing::debug!(
            root = %root.display(),
            included = included.len(),
            visited = stats.entries_visited,
            elapsed_ms = scan_duration.as_millis() as u64,
            "finished context scan"
        );

        ScanReport {
            root,
            included,
            stats,
            scan_duration,
        }
    }

    fn send_progress(&self, ctx: &ScanContext<'_>, current_path: PathBuf, start: Instant, finished: bool) {
        let stats = ctx.stats();
        // No receivers is fine.
        let _ = self.progress_tx.send(ScanProgress {
            entries_visited: stats.entries_visited,
            included: ctx.included_len() as u64,
            excluded: stats.excluded,
            current_path,
            elapsed: start.elapsed(),
            finished,
        });
    }
}

impl Default for ContextScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure a serial, sorted walk that never enters the fixed pruned
/// directories and, in fast-prune mode, skips the children of matched
/// directories.
fn build_walker(
    root: &Path,
    patterns: &PatternSet,
    fast_prune: bool,
    pruned: Arc<AtomicU64>,
) -> WalkDir {
    let prune_set = fast_prune.then(|| Arc::new(patterns.clone()));

    WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(0)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|child| match child {
                Ok(entry)
                    if entry.file_type().is_dir()
                        && PatternSet::is_pruned_name(entry.file_name()) =>
                {
                    pruned.fetch_add(1, Ordering::Relaxed);
                    false
                }
                _ => true,
            });

            if let Some(set) = &prune_set {
                for entry in children.iter_mut().flatten() {
                    if entry.file_type().is_dir() && set.excludes(&entry.path(), true) {
                        entry.read_children_path = None;
                        pruned.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        })
}

fn ensure_directory(root: &Path) -> Result<(), ScanError> {
    let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

fn walk_error(root: &Path, err: jwalk::Error) -> ScanError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    traversal_error(path, std::io::Error::from(err))
}

/// Map an I/O failure below the root. `NotFound` is reserved for the root
/// itself, so an entry that vanishes mid-walk becomes a plain `Io` error.
fn traversal_error(path: PathBuf, source: std::io::Error) -> ScanError {
    if source.kind() == std::io::ErrorKind::NotFound {
        return ScanError::Io { path, source };
    }
    ScanError::io(path, source)
}
