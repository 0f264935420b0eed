//! # doc-gate
//!
//! Keeps a consolidated documentation tree clean.
//!
//! Two independent operations share one configuration:
//!
//! - [`sync_sources`] copies an approved list of source files into the docs
//!   tree, refusing any source whose file name looks like a junk doc.
//! - [`validate_fs`] walks the docs tree and checks each markdown file under
//!   the allowed roots for junk file names, frontmatter presence and required
//!   fields, and malformed inline links.
//!
//! The per-file check is the pure function [`check_document`], so the rules can
//! be applied to content from anywhere.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use doc_gate::{validate_fs, FsSourceConfig, ValidationConfig};
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.paths = vec![PathBuf::from(".")];
//!
//! let mut validation_config = ValidationConfig::default();
//! validation_config.use_strict_frontmatter();
//!
//! let report = validate_fs(&fs_config, &validation_config).unwrap();
//! println!("Files checked: {}", report.checked_files);
//! println!("Errors: {}", report.total_errors());
//! println!("OK: {}", report.ok);
//! ```

mod blocklist;
mod check;
mod config;
mod error;
mod frontmatter;
mod links;
pub mod output;
mod report;
mod strategy;
mod sync;

pub use blocklist::Blocklist;
pub use check::check_document;
pub use config::{
    DEFAULT_ALLOWED_FILES, DEFAULT_ALLOWED_ROOTS, DEFAULT_BLOCKED_PATTERNS, DEFAULT_CONFIG_FILE,
    DEFAULT_IGNORED_DIRS, DEFAULT_REQUIRED_FIELDS, DocGateConfig, FsSourceConfig,
    STRICT_REQUIRED_FIELDS, SyncConfig, SyncSection, ValidateSection, ValidationConfig,
};
pub use error::{ConfigError, ScanError, ScanErrorKind, ValidationError, ValidationErrorKind};
pub use frontmatter::Frontmatter;
pub use report::ValidationReport;
pub use sync::{SyncEntryResult, SyncManifest, SyncMapping, SyncOutcome, SyncReport, sync_sources};

use strategy::fs::{ScanResult, find_files, read_file_bounded};

/// Validate markdown files on disk.
///
/// This is the primary validation API.
///
/// # Arguments
///
/// * `fs_config` - Filesystem options (scan paths, allowlist, ignored dirs, excludes, limits)
/// * `validation_config` - Document rules (blocklist, required fields, link checks)
///
/// # Errors
///
/// Returns an error if `fs_config.paths` is empty or if any provided path does not exist.
/// Returns `Ok` with `checked_files: 0` if paths exist but contain no checkable files.
/// A file that cannot be read is reported in `report.scan_errors` and the
/// remaining files are still checked.
pub fn validate_fs(
    fs_config: &FsSourceConfig,
    validation_config: &ValidationConfig,
) -> anyhow::Result<ValidationReport> {
    if fs_config.paths.is_empty() {
        anyhow::bail!("No paths provided for validation");
    }

    for path in &fs_config.paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    let discovery = find_files(fs_config);
    let mut scan_errors = discovery.scan_errors;
    let mut failed_files = scan_errors.len();
    let mut checked_files: usize = 0;
    let mut validation_errors = Vec::new();

    for file_path in &discovery.files {
        let content = match read_file_bounded(file_path, fs_config.max_file_size) {
            ScanResult::Ok(c) => c,
            ScanResult::Err(e) => {
                tracing::warn!(path = %file_path.display(), "{}", e.message);
                scan_errors.push(e);
                failed_files += 1;
                continue;
            }
        };

        checked_files += 1;
        validation_errors.extend(check_document(file_path, &content, validation_config));
    }

    let ok = validation_errors.is_empty() && scan_errors.is_empty();
    tracing::info!(
        discovered = discovery.discovered,
        checked = checked_files,
        failed = failed_files,
        errors = validation_errors.len(),
        "validation finished"
    );

    Ok(ValidationReport {
        discovered_files: discovery.discovered,
        checked_files,
        failed_files,
        ok,
        validation_errors,
        scan_errors,
    })
}
