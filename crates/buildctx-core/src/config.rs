//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Name of the ignore file looked up in the scan root by default.
pub const DEFAULT_IGNORE_FILE: &str = ".dockerignore";

/// Configuration for resolving a build context.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory of the build context.
    pub root: PathBuf,

    /// Ignore file to load. Relative paths are resolved against `root`.
    #[builder(default = "PathBuf::from(DEFAULT_IGNORE_FILE)")]
    #[serde(default = "default_ignore_file")]
    pub ignore_file: PathBuf,

    /// Patterns evaluated after the ignore file's own lines.
    #[builder(default)]
    #[serde(default)]
    pub extra_patterns: Vec<String>,

    /// Don't descend into matched directories when no pattern is negated.
    ///
    /// This treats a matched directory as excluding its entire subtree,
    /// which is stricter than the default one-level inheritance.
    #[builder(default = "false")]
    #[serde(default)]
    pub fast_prune: bool,
}

fn default_ignore_file() -> PathBuf {
    PathBuf::from(DEFAULT_IGNORE_FILE)
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self
            .ignore_file
            .as_ref()
            .is_some_and(|f| f.as_os_str().is_empty())
        {
            return Err("Ignore file name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_file: default_ignore_file(),
            extra_patterns: Vec::new(),
            fast_prune: false,
        }
    }

    /// Location of the ignore file for a given (canonical) root.
    pub fn ignore_file_in(&self, root: &Path) -> PathBuf {
        if self.ignore_file.is_absolute() {
            self.ignore_file.clone()
        } else {
            root.join(&self.ignore_file)
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
