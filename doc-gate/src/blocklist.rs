//! Junk-doc filename blocklist.
//!
//! Patterns are case-insensitive regular expressions matched against the file
//! name only, never the directory part of a path or the file content.

use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::config::DEFAULT_BLOCKED_PATTERNS;
use crate::error::ConfigError;

/// A compiled set of blocked filename patterns.
#[derive(Debug, Clone)]
pub struct Blocklist {
    patterns: Vec<Regex>,
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl Blocklist {
    /// Compile a blocklist from pattern strings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BlockedPattern` for the first pattern that is not a
    /// valid regular expression.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = compile(pattern).map_err(|e| ConfigError::BlockedPattern {
                pattern: pattern.to_owned(),
                cause: e.to_string(),
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// The built-in pattern set (`DEFAULT_BLOCKED_PATTERNS`).
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile, which is a programming error.
    #[must_use]
    pub fn builtin() -> Self {
        match Self::new(DEFAULT_BLOCKED_PATTERNS) {
            Ok(blocklist) => blocklist,
            Err(err) => panic!("Invalid built-in blocked pattern: {err}"),
        }
    }

    /// Return the first pattern matching `file_name`, if any.
    #[must_use]
    pub fn find_match(&self, file_name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(file_name))
            .map(Regex::as_str)
    }

    /// Whether `file_name` matches any blocked pattern.
    #[must_use]
    pub fn is_blocked(&self, file_name: &str) -> bool {
        self.find_match(file_name).is_some()
    }

    /// Whether the file name component of `path` is blocked.
    ///
    /// A path without a file name (e.g. `/` or `..`) is never blocked.
    #[must_use]
    pub fn is_blocked_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.is_blocked(&name.to_string_lossy()))
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::builtin()
    }
}
