//! Filesystem validation source.
//!
//! Discovers markdown files on disk and reads them safely for the validation
//! pipeline:
//! - Ignored directory names and dot-directories are never descended into
//! - The root allowlist decides which discovered files are checked
//! - Symlinks are not followed by default, and resolved paths must stay inside
//!   the scan root
//! - Bounded streaming reads keep oversized files out of memory

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::FsSourceConfig;
use crate::error::{ScanError, ScanErrorKind};

/// Result of attempting to read a file for checking.
pub enum ScanResult {
    /// File was read successfully; contains the UTF-8 content.
    Ok(String),
    /// File could not be read; contains the scan error.
    Err(ScanError),
}

/// Outcome of discovery.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files that passed every filter, sorted and deduplicated.
    pub files: Vec<PathBuf>,
    /// Markdown files found, including those outside the allowlist.
    pub discovered: usize,
    /// Walk errors, boundary violations and bad exclude patterns.
    pub scan_errors: Vec<ScanError>,
}

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Whether a walk entry should be descended into / yielded.
/// The scan root itself (depth 0) is always kept, so `.` works as a root.
fn is_not_ignored_dir(entry: &walkdir::DirEntry, ignored_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    match entry.file_name().to_str() {
        Some(name) => !name.starts_with('.') && !ignored_dirs.iter().any(|d| d == name),
        None => true,
    }
}

/// Check if file has a markdown extension.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Apply the root allowlist to a path relative to the allowlist base.
fn is_allowed(relative: &Path, config: &FsSourceConfig) -> bool {
    if config.allowed_roots.is_empty() && config.allowed_files.is_empty() {
        return true;
    }

    let components: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    match components.as_slice() {
        [] => false,
        [file] => config.allowed_files.iter().any(|f| f == file),
        [top, ..] => config.allowed_roots.iter().any(|r| r == top),
    }
}

fn compile_excludes(config: &FsSourceConfig, scan_errors: &mut Vec<ScanError>) -> Vec<Pattern> {
    let mut exclude_patterns = Vec::with_capacity(config.exclude.len());
    for pat_str in &config.exclude {
        match Pattern::new(pat_str) {
            Ok(pat) => exclude_patterns.push(pat),
            Err(e) => {
                scan_errors.push(ScanError::new(
                    pat_str,
                    ScanErrorKind::InvalidExcludePattern,
                    format!("Invalid exclude glob pattern '{pat_str}': {e}"),
                ));
            }
        }
    }
    exclude_patterns
}

/// Find all markdown files to check in the configured paths.
///
/// A path given directly as a file is checked if it is markdown and not
/// excluded; the allowlist applies only to files found by walking a directory.
/// Failures are returned in `scan_errors`, never silently discarded.
#[must_use]
pub fn find_files(config: &FsSourceConfig) -> Discovery {
    let mut discovery = Discovery::default();
    let exclude_patterns = compile_excludes(config, &mut discovery.scan_errors);

    let canonical_base = config.base_dir.as_deref().and_then(|base| {
        base.canonicalize()
            .inspect_err(|e| {
                tracing::warn!(path = %base.display(), "cannot resolve allowlist base: {e}");
            })
            .ok()
    });

    for root in &config.paths {
        if root.is_file() {
            if is_markdown(root) && !matches_exclude(root, &exclude_patterns) {
                discovery.discovered += 1;
                discovery.files.push(root.clone());
            }
            continue;
        }

        if !root.is_dir() {
            continue;
        }

        let canonical_root = match root.canonicalize() {
            Ok(r) => r,
            Err(e) => {
                discovery.scan_errors.push(ScanError::new(
                    root.clone(),
                    ScanErrorKind::IoError,
                    format!("Failed to canonicalize root path: {e}"),
                ));
                continue;
            }
        };

        for entry_result in WalkDir::new(root)
            .follow_links(config.follow_links)
            .max_depth(config.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| is_not_ignored_dir(e, &config.ignored_dirs))
        {
            let entry = match entry_result {
                Ok(e) => e,
                Err(walk_err) => {
                    let path = walk_err
                        .path()
                        .map_or_else(|| root.clone(), Path::to_path_buf);
                    tracing::warn!(path = %path.display(), "directory traversal error: {walk_err}");
                    discovery.scan_errors.push(ScanError::new(
                        path,
                        ScanErrorKind::WalkError,
                        format!("Directory traversal error: {walk_err}"),
                    ));
                    continue;
                }
            };

            let file_path = entry.path();
            if !file_path.is_file() || !is_markdown(file_path) {
                continue;
            }
            discovery.discovered += 1;

            let relative = file_path.strip_prefix(root).unwrap_or(file_path);
            let from_base = canonical_base.as_deref().and_then(|base| {
                canonical_root
                    .join(relative)
                    .strip_prefix(base)
                    .ok()
                    .map(Path::to_path_buf)
            });
            if !is_allowed(from_base.as_deref().unwrap_or(relative), config) {
                tracing::debug!(path = %file_path.display(), "outside allowed roots, not checked");
                continue;
            }

            if matches_exclude(file_path, &exclude_patterns) {
                tracing::debug!(path = %file_path.display(), "excluded by pattern");
                continue;
            }

            // Symlinked files may resolve outside the scan root even when links
            // are not followed for directories.
            match file_path.canonicalize() {
                Ok(canonical_path) if !canonical_path.starts_with(&canonical_root) => {
                    discovery.scan_errors.push(ScanError::new(
                        file_path,
                        ScanErrorKind::OutsideRoot,
                        format!(
                            "Path resolves outside scan root: {} -> {}",
                            file_path.display(),
                            canonical_path.display()
                        ),
                    ));
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    discovery.scan_errors.push(ScanError::new(
                        file_path,
                        ScanErrorKind::IoError,
                        format!("Failed to canonicalize path: {e}"),
                    ));
                    continue;
                }
            }

            discovery.files.push(file_path.to_path_buf());
        }
    }

    discovery.files.sort();
    discovery.files.dedup();
    discovery
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Reads at most `max_file_size + 1` bytes (saturating at `u64::MAX`) so an
/// oversized file is detected without loading it fully. Returns
/// `ScanResult::Err` if the file is too large, an I/O error occurs, or the
/// content is not valid UTF-8.
#[must_use]
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> ScanResult {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return ScanResult::Err(ScanError::new(
                path,
                ScanErrorKind::IoError,
                format!("Failed to open file: {e}"),
            ));
        }
    };

    let mut buffer = Vec::new();
    if let Err(e) = file.take(max_file_size.saturating_add(1)).read_to_end(&mut buffer) {
        return ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::IoError,
            format!("Failed to read file: {e}"),
        ));
    }

    if buffer.len() as u64 > max_file_size {
        return ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::FileTooLarge,
            format!("File exceeds maximum size of {max_file_size} bytes"),
        ));
    }

    match String::from_utf8(buffer) {
        Ok(content) => ScanResult::Ok(content),
        Err(_) => ScanResult::Err(ScanError::new(
            path,
            ScanErrorKind::InvalidEncoding,
            "File is not valid UTF-8".to_owned(),
        )),
    }
}
