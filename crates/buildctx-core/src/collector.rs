//! Ordered, de-duplicated accumulation of included paths.

use indexmap::IndexSet;

/// Root-relative paths accepted into the build context, in the order they
/// were first seen.
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    paths: IndexSet<String>,
}

impl ResultCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    /// Check whether a path has been collected.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of collected paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over collected paths in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Consume the collector, yielding paths in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.paths.into_iter().collect()
    }
}
