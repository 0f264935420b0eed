//! Error types for documentation validation and sync configuration.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// The kind of problem found in a checked markdown file.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationErrorKind {
    /// The filename matches a blocked pattern.
    JunkFilenameDetected,
    /// No leading `---` delimited block was found.
    MissingFrontmatter,
    /// The frontmatter block is present but a required key is absent.
    MissingFrontmatterField,
    /// An inline link has an empty or whitespace-broken target.
    MalformedLink,
}

/// The kind of scan-level failure that prevented a file from being checked.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while reading the file.
    IoError,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
    /// The file content is not valid UTF-8.
    InvalidEncoding,
    /// The resolved path is outside the scan root (symlink escape).
    OutsideRoot,
    /// A directory traversal error (permission denied, loop detected, etc.).
    WalkError,
    /// An exclude glob pattern could not be parsed.
    InvalidExcludePattern,
}

/// A scan-level error: a file that could not be checked at all.
///
/// These are distinct from `ValidationError` (a problem found in a file that
/// was read). A `ScanError` means the file could not even be read, so the run
/// must still be treated as a failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The file path that could not be scanned.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, kind: ScanErrorKind, message: String) -> Self {
        Self {
            file: file.into(),
            kind,
            message,
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [scan error] {}", self.file.display(), self.message)
    }
}

/// A single problem found in a markdown file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationError {
    /// File path where the error was found
    pub file: PathBuf,
    /// What went wrong
    pub kind: ValidationErrorKind,
    /// Line number (1-indexed) for errors tied to a line; 0 for file-level errors
    pub line: usize,
    /// Human-readable error description
    pub message: String,
}

impl ValidationError {
    /// An error about the file as a whole (line 0).
    #[must_use]
    pub fn file_level(
        file: impl Into<PathBuf>,
        kind: ValidationErrorKind,
        message: String,
    ) -> Self {
        Self {
            file: file.into(),
            kind,
            line: 0,
            message,
        }
    }

    /// Format the error for the per-file listing.
    ///
    /// File-level errors print the bare message; line-level errors are
    /// prefixed with `line {n}: `.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        if self.line > 0 {
            format!("line {}: {}", self.line, self.message)
        } else {
            self.message.clone()
        }
    }
}

/// Failures while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for `DocGateConfig`.
    #[error("Invalid config {}: {cause}", path.display())]
    Parse { path: PathBuf, cause: String },

    /// A blocked pattern is not a valid regular expression.
    #[error("Invalid blocked pattern '{pattern}': {cause}")]
    BlockedPattern { pattern: String, cause: String },

    /// A sync destination is absolute or climbs out of the destination root.
    #[error("Sync destination escapes the destination root: {}", destination.display())]
    DestinationEscape { destination: PathBuf },

    /// A sync source is not an absolute path.
    #[error("Sync source must be an absolute path: {}", source_path.display())]
    RelativeSource { source_path: PathBuf },
}
