//! Validation report types.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{ScanError, ValidationError};

/// Result of a validation run.
///
/// A non-empty `scan_errors` means some files could not be checked at all.
/// The run fails in that case even when `validation_errors` is empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Markdown files found, whether or not the allowlist selected them.
    pub discovered_files: usize,
    /// Number of files read and checked.
    pub checked_files: usize,
    /// Number of files that could not be checked (discovery or read failures).
    pub failed_files: usize,
    /// Whether every checked file passed AND no scan errors occurred.
    pub ok: bool,
    /// Problems found in checked files, in file order.
    pub validation_errors: Vec<ValidationError>,
    /// Scan-level errors: files that could not be read.
    pub scan_errors: Vec<ScanError>,
}

impl ValidationReport {
    /// Number of problems found in checked files.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.validation_errors.len()
    }

    /// Every error that fails the run: validation plus scan errors.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.validation_errors.len() + self.scan_errors.len()
    }

    /// Validation errors grouped by file, files in path order and errors in
    /// the order they were found.
    #[must_use]
    pub fn errors_by_file(&self) -> BTreeMap<&Path, Vec<&ValidationError>> {
        let mut grouped: BTreeMap<&Path, Vec<&ValidationError>> = BTreeMap::new();
        for error in &self.validation_errors {
            grouped.entry(error.file.as_path()).or_default().push(error);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;

    fn err(file: &str, message: &str) -> ValidationError {
        ValidationError::file_level(file, ValidationErrorKind::MissingFrontmatter, message.to_owned())
    }

    #[test]
    fn test_errors_grouped_by_file_in_path_order() {
        let report = ValidationReport {
            discovered_files: 3,
            checked_files: 2,
            failed_files: 0,
            ok: false,
            validation_errors: vec![err("docs/b.md", "one"), err("docs/a.md", "two"), err("docs/b.md", "three")],
            scan_errors: vec![],
        };

        let grouped = report.errors_by_file();
        let files: Vec<_> = grouped.keys().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(files, vec!["docs/a.md", "docs/b.md"]);
        let b: Vec<_> = grouped[Path::new("docs/b.md")]
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(b, vec!["one", "three"]);
        assert_eq!(report.total_errors(), 3);
    }
}
