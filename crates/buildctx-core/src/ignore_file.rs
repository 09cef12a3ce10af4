//! Reading pattern lines from an ignore file.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ScanError;

/// Read the pattern lines of an ignore file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_ignore_file(path: &Path) -> Result<Option<Vec<String>>, ScanError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_ignore_lines(&content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ScanError::io(path, err)),
    }
}

/// Split ignore-file content into trimmed pattern lines, dropping blank
/// lines and `#` comments.
pub fn parse_ignore_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
