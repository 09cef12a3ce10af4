//! Glob pattern compilation.
//!
//! Each ignore-file line is translated into a regular expression anchored
//! at the absolute scan root, so a compiled pattern only ever matches whole
//! absolute paths that live under that root.
//!
//! Translation rules, applied left to right:
//!
//! | glob            | expression                                  |
//! |-----------------|---------------------------------------------|
//! | `?`             | one character other than the separator      |
//! | `*`             | anything, separators included               |
//! | `**` at the end | the rest of the path                        |
//! | `**/` inside    | zero or more complete segments              |
//! | `[...]`         | a character class (`[!...]` negates)        |
//! | `\x`            | the literal `x` (a separator on Windows)    |
//!
//! Every other character is matched literally.

use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, is_separator};

use compact_str::CompactString;
use regex::Regex;

use crate::error::CompileError;

/// A single compiled ignore rule.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    raw: CompactString,
    negated: bool,
    dir_only: bool,
    matcher: Regex,
}

impl IgnorePattern {
    /// Compile `pattern` for a scan rooted at `root`.
    ///
    /// `root` should be the absolute, canonical scan root; the compiled
    /// matcher is tested against absolute entry paths under it.
    pub fn compile(pattern: &str, root: &Path) -> Result<Self, CompileError> {
        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };

        let body = normalize(body);
        let dir_only = is_dir_pattern(&body);
        let expr = anchor(root, &translate(&body));

        let matcher = Regex::new(&expr).map_err(|e| CompileError::new(pattern, e))?;

        tracing::debug!(pattern, %expr, negated, dir_only, "compiled ignore pattern");

        Ok(Self {
            raw: CompactString::new(pattern),
            negated,
            dir_only,
            matcher,
        })
    }

    /// The pattern text as it appeared in the ignore file.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern re-includes what it matches (leading `!`).
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Whether the pattern only applies to directories.
    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// The anchored expression the pattern was compiled to.
    pub fn expression(&self) -> &str {
        self.matcher.as_str()
    }

    /// Test an absolute path string against the anchored matcher.
    pub fn is_match(&self, absolute: &str) -> bool {
        self.matcher.is_match(absolute)
    }

    /// Test a visited entry against this pattern.
    ///
    /// The plain absolute path is always tested. A directory checked
    /// against a directory-only pattern is also tested with a trailing
    /// separator, so `target/` matches the `target` directory itself.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        let absolute = path.to_string_lossy();
        if self.matcher.is_match(&absolute) {
            return true;
        }
        if !(self.dir_only && is_dir) {
            return false;
        }
        let mut with_sep = absolute.into_owned();
        if !with_sep.ends_with(is_separator) {
            with_sep.push(MAIN_SEPARATOR);
        }
        self.matcher.is_match(&with_sep)
    }
}

/// Lexically clean a pattern body.
///
/// Collapses repeated separators, drops `.` segments, folds `a/..` and
/// strips a leading separator. A trailing separator is kept.
fn normalize(body: &str) -> String {
    let trailing = body.ends_with(is_separator) && !body.trim_matches(is_separator).is_empty();

    let mut segments: Vec<&str> = Vec::new();
    for segment in body.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." if segments.last().is_some_and(|last| *last != "..") => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut cleaned = segments.join(MAIN_SEPARATOR_STR);
    if trailing && !cleaned.is_empty() {
        cleaned.push(MAIN_SEPARATOR);
    }
    cleaned
}

/// `dir/` and `dir/*` only ever describe directories.
fn is_dir_pattern(body: &str) -> bool {
    let body = body.strip_suffix('*').unwrap_or(body);
    body.ends_with(is_separator)
}

fn separator_expr() -> String {
    regex::escape(MAIN_SEPARATOR_STR)
}

fn push_literal(expr: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    expr.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}

/// Translate a normalized glob body into an unanchored expression.
fn translate(body: &str) -> String {
    let sep = separator_expr();
    let mut expr = String::with_capacity(body.len() * 2);
    let mut chars = body.chars().peekable();
    let mut in_class = false;

    while let Some(ch) = chars.next() {
        if in_class {
            match ch {
                ']' => {
                    in_class = false;
                    expr.push(']');
                }
                '\\' if cfg!(windows) => expr.push_str(&sep),
                '\\' => match chars.next() {
                    Some(next) => push_literal(&mut expr, next),
                    None => expr.push_str(r"\\"),
                },
                // Nested classes and set operators are regex syntax, not glob.
                '[' | '&' | '~' => push_literal(&mut expr, ch),
                _ => expr.push(ch),
            }
            continue;
        }

        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek().copied().is_some_and(is_separator) {
                    chars.next();
                }
                if chars.peek().is_none() {
                    expr.push_str(".*");
                } else {
                    expr.push_str("(?:.*");
                    expr.push_str(&sep);
                    expr.push_str(")?");
                }
            }
            '*' => expr.push_str(".*"),
            '?' => {
                expr.push_str("[^");
                expr.push_str(&sep);
                expr.push(']');
            }
            '[' => {
                in_class = true;
                expr.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    expr.push('^');
                }
            }
            '\\' if cfg!(windows) => expr.push_str(&sep),
            '\\' => match chars.next() {
                Some(next) => push_literal(&mut expr, next),
                None => expr.push_str(r"\\"),
            },
            _ => push_literal(&mut expr, ch),
        }
    }

    expr
}

/// Anchor a translated body to `root` and to end of input.
fn anchor(root: &Path, body: &str) -> String {
    let root = root.to_string_lossy();
    let root = root.trim_end_matches(is_separator);
    format!("(?s)^{}{}{}$", regex::escape(root), separator_expr(), body)
}
