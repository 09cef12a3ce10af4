//! Error types for pattern compilation and scanning.

use std::path::PathBuf;

use thiserror::Error;

/// A pattern that could not be turned into a matcher.
#[derive(Debug, Error)]
#[error("Invalid ignore pattern {pattern:?}: {source}")]
pub struct CompileError {
    /// The pattern as written in the ignore file.
    pub pattern: String,
    /// Why the translated expression was rejected.
    #[source]
    pub source: regex::Error,
}

impl CompileError {
    /// Create a compile error for a pattern.
    pub fn new(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Errors that can occur while resolving a build context.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An ignore pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan was cancelled.
    #[error("Operation interrupted")]
    Interrupted,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Whether the error means the scan root itself is unusable.
    ///
    /// The scanner only produces `NotFound` while resolving the root;
    /// entries that disappear during the walk surface as `Io`.
    pub fn is_missing_root(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotADirectory { .. })
    }
}
