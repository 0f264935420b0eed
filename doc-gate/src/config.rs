//! Configuration types for validation and sync.
//!
//! Split into core validation rules (what a document must look like), the
//! filesystem source options (which files are discovered and checked) and the
//! sync options. `DocGateConfig` is the on-disk YAML form that feeds all three.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::blocklist::Blocklist;
use crate::error::ConfigError;
use crate::sync::{SyncManifest, SyncMapping};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "doc-gate.yaml";

/// Case-insensitive filename patterns that mark a junk doc.
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &[
    "SUMMARY", "COMPLETE", "STATUS", "SESSION", "PROGRESS", "HANDOFF", "SCRATCH",
];

/// Directory names never descended into. Dot-directories are always skipped.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "dist", "target", "vendor", "cache"];

/// Top-level directories whose markdown is checked.
pub const DEFAULT_ALLOWED_ROOTS: &[&str] = &["docs"];

/// Top-level files that are checked on their own.
pub const DEFAULT_ALLOWED_FILES: &[&str] = &["index.md"];

/// Frontmatter keys every document must carry.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &["title"];

/// Frontmatter keys required by the strict variant.
pub const STRICT_REQUIRED_FIELDS: &[&str] = &["title", "description"];

fn to_owned_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Core validation rules, independent of where content comes from.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Filename blocklist applied before any content check.
    pub blocklist: Blocklist,
    /// Keys that must appear as `key:` line prefixes inside the frontmatter.
    pub required_fields: Vec<String>,
    /// Check inline markdown links for empty or broken targets.
    pub check_links: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            blocklist: Blocklist::builtin(),
            required_fields: to_owned_vec(DEFAULT_REQUIRED_FIELDS),
            check_links: true,
        }
    }
}

impl ValidationConfig {
    /// Switch to the strict frontmatter variant (`title` and `description`).
    pub fn use_strict_frontmatter(&mut self) {
        for field in STRICT_REQUIRED_FIELDS {
            if !self.required_fields.iter().any(|f| f == field) {
                self.required_fields.push((*field).to_owned());
            }
        }
    }
}

/// Filesystem-specific source options.
///
/// `paths` are the scan roots. The allowlist (`allowed_roots` and
/// `allowed_files`) is evaluated relative to `base_dir` when it is set and
/// contains the file, otherwise relative to the file's scan root: a file is
/// checked only if its first path component is an allowed root directory, or
/// if it sits directly in the base and its name is an allowed file. Leaving
/// both allowlists empty checks every discovered file.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Paths to scan (files or directories). Must be non-empty.
    pub paths: Vec<PathBuf>,
    /// Directory the allowlist is evaluated against, usually the working
    /// directory. `None` evaluates it against each scan root.
    pub base_dir: Option<PathBuf>,
    /// Top-level directory names whose files are checked.
    pub allowed_roots: Vec<String>,
    /// Top-level file names that are checked.
    pub allowed_files: Vec<String>,
    /// Directory names skipped during traversal (in addition to dot-directories).
    pub ignored_dirs: Vec<String>,
    /// Exclude patterns (glob format), matched against the path and the file name.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from(".")],
            base_dir: None,
            allowed_roots: to_owned_vec(DEFAULT_ALLOWED_ROOTS),
            allowed_files: to_owned_vec(DEFAULT_ALLOWED_FILES),
            ignored_dirs: to_owned_vec(DEFAULT_IGNORED_DIRS),
            exclude: Vec::new(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}

/// Options for a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SyncConfig {
    /// Filename blocklist applied to every source.
    pub blocklist: Blocklist,
    /// Directory the relative destinations are resolved against.
    pub destination_root: PathBuf,
    /// Evaluate every entry but write nothing.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            blocklist: Blocklist::builtin(),
            destination_root: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// `validate:` section of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateSection {
    /// Top-level directories whose markdown is checked.
    pub allowed_roots: Vec<String>,
    /// Top-level files checked on their own.
    pub allowed_files: Vec<String>,
    /// Directory names never walked into.
    pub ignored_dirs: Vec<String>,
    /// Glob patterns for files to skip.
    pub exclude: Vec<String>,
    /// Frontmatter keys every document must carry.
    pub required_fields: Vec<String>,
    /// Check inline links.
    pub check_links: bool,
    /// Largest file read, in bytes.
    pub max_file_size: u64,
}

impl Default for ValidateSection {
    fn default() -> Self {
        let fs = FsSourceConfig::default();
        Self {
            allowed_roots: fs.allowed_roots,
            allowed_files: fs.allowed_files,
            ignored_dirs: fs.ignored_dirs,
            exclude: fs.exclude,
            required_fields: to_owned_vec(DEFAULT_REQUIRED_FIELDS),
            check_links: true,
            max_file_size: fs.max_file_size,
        }
    }
}

/// `sync:` section of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSection {
    /// Directory destinations are resolved against.
    pub destination_root: PathBuf,
    /// Approved source to destination pairs, in processing order.
    pub mapping: Vec<SyncMapping>,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            destination_root: PathBuf::from("."),
            mapping: Vec::new(),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocGateConfig {
    /// Case-insensitive junk filename regexes, shared by both commands.
    pub blocked_patterns: Vec<String>,
    /// `validate` options.
    pub validate: ValidateSection,
    /// `sync` options.
    pub sync: SyncSection,
}

impl Default for DocGateConfig {
    fn default() -> Self {
        Self {
            blocked_patterns: to_owned_vec(DEFAULT_BLOCKED_PATTERNS),
            validate: ValidateSection::default(),
            sync: SyncSection::default(),
        }
    }
}

impl DocGateConfig {
    /// Parse a configuration from YAML text. `origin` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not a valid config document.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str::<Self>(content).map_err(|e| ConfigError::Parse {
            path: origin.to_owned(),
            cause: e.to_string(),
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_yaml(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given, otherwise `DEFAULT_CONFIG_FILE` in `dir` if it
    /// exists, otherwise the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected file cannot be read or parsed. An
    /// explicit path that does not exist is an error; a missing default file
    /// is not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            tracing::debug!("no config file found, using built-in defaults");
            Ok(Self::default())
        }
    }

    /// Compile the blocked patterns.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BlockedPattern` for the first invalid regex.
    pub fn blocklist(&self) -> Result<Blocklist, ConfigError> {
        Blocklist::new(&self.blocked_patterns)
    }

    /// Build the core validation rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a blocked pattern is invalid.
    pub fn validation_config(&self) -> Result<ValidationConfig, ConfigError> {
        Ok(ValidationConfig {
            blocklist: self.blocklist()?,
            required_fields: self.validate.required_fields.clone(),
            check_links: self.validate.check_links,
        })
    }

    /// Build the filesystem source options, scanning `paths`.
    #[must_use]
    pub fn fs_source_config(&self, paths: Vec<PathBuf>) -> FsSourceConfig {
        FsSourceConfig {
            paths,
            allowed_roots: self.validate.allowed_roots.clone(),
            allowed_files: self.validate.allowed_files.clone(),
            ignored_dirs: self.validate.ignored_dirs.clone(),
            exclude: self.validate.exclude.clone(),
            max_file_size: self.validate.max_file_size,
            ..FsSourceConfig::default()
        }
    }

    /// Build the sync options.
    ///
    /// # Errors
    ///
    /// Returns an error if a blocked pattern is invalid.
    pub fn sync_config(&self) -> Result<SyncConfig, ConfigError> {
        Ok(SyncConfig {
            blocklist: self.blocklist()?,
            destination_root: self.sync.destination_root.clone(),
            dry_run: false,
        })
    }

    /// Build the approved source mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry has a relative source or an escaping
    /// destination.
    pub fn sync_manifest(&self) -> Result<SyncManifest, ConfigError> {
        SyncManifest::new(self.sync.mapping.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_tables() {
        let config = DocGateConfig::default();
        assert_eq!(config.blocked_patterns.len(), DEFAULT_BLOCKED_PATTERNS.len());
        assert_eq!(config.validate.required_fields, vec!["title".to_owned()]);
        assert!(config.validate.check_links);
        assert!(config.sync.mapping.is_empty());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = DocGateConfig::from_yaml("  \n", Path::new("doc-gate.yaml")).unwrap();
        assert_eq!(config.validate.allowed_roots, vec!["docs".to_owned()]);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "validate:\n  allowed_roots: [guide, api]\n  check_links: false\n";
        let config = DocGateConfig::from_yaml(yaml, Path::new("doc-gate.yaml")).unwrap();

        assert_eq!(
            config.validate.allowed_roots,
            vec!["guide".to_owned(), "api".to_owned()]
        );
        assert!(!config.validate.check_links);
        assert_eq!(config.validate.required_fields, vec!["title".to_owned()]);
        assert_eq!(config.blocked_patterns.len(), DEFAULT_BLOCKED_PATTERNS.len());
    }

    #[test]
    fn test_sync_mapping_yaml() {
        let yaml = concat!(
            "sync:\n",
            "  destination_root: site\n",
            "  mapping:\n",
            "    - source: /src/project/README.md\n",
            "      destination: docs/project/readme.md\n",
        );
        let config = DocGateConfig::from_yaml(yaml, Path::new("doc-gate.yaml")).unwrap();

        assert_eq!(config.sync.destination_root, PathBuf::from("site"));
        assert_eq!(config.sync.mapping.len(), 1);
        let manifest = config.sync_manifest().unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_max_file_size_upper_bound_is_accepted() {
        let yaml = "validate:\n  max_file_size: 18446744073709551615\n";
        let config = DocGateConfig::from_yaml(yaml, Path::new("doc-gate.yaml")).unwrap();
        let fs_config = config.fs_source_config(vec![PathBuf::from(".")]);
        assert_eq!(fs_config.max_file_size, u64::MAX);
        assert_eq!(fs_config.base_dir, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = DocGateConfig::from_yaml("colour: red\n", Path::new("bad.yaml"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad.yaml"), "got: {err}");
    }

    #[test]
    fn test_invalid_blocked_pattern_rejected() {
        let config = DocGateConfig {
            blocked_patterns: vec!["(unclosed".to_owned()],
            ..DocGateConfig::default()
        };
        assert!(config.validation_config().is_err());
        assert!(config.sync_config().is_err());
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = DocGateConfig::discover(None, tmp.path()).unwrap();
        assert_eq!(config.validate.allowed_files, vec!["index.md".to_owned()]);
    }

    #[test]
    fn test_discover_reads_default_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(DEFAULT_CONFIG_FILE),
            "blocked_patterns: [DRAFT]\n",
        )
        .unwrap();
        let config = DocGateConfig::discover(None, tmp.path()).unwrap();
        assert_eq!(config.blocked_patterns, vec!["DRAFT".to_owned()]);
    }

    #[test]
    fn test_discover_explicit_missing_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope.yaml");
        let result = DocGateConfig::discover(Some(&missing), tmp.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_strict_frontmatter_adds_description_once() {
        let mut config = ValidationConfig::default();
        config.use_strict_frontmatter();
        config.use_strict_frontmatter();
        assert_eq!(
            config.required_fields,
            vec!["title".to_owned(), "description".to_owned()]
        );
    }
}
