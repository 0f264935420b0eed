//! One-way sync of approved source files into the documentation tree.
//!
//! Every manifest entry is handled independently. Blocked sources are never
//! read, missing sources are reported as such, and everything else is copied
//! byte-for-byte over the destination (last write wins).

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::ConfigError;

/// One approved `(source, destination)` pair.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SyncMapping {
    /// Absolute path of the file to copy.
    pub source: PathBuf,
    /// Path relative to the destination root.
    pub destination: PathBuf,
}

impl SyncMapping {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// The approved source mapping, checked once at construction.
#[derive(Debug, Clone, Default)]
pub struct SyncManifest {
    entries: Vec<SyncMapping>,
}

/// A destination must name something below the root: only normal and `.`
/// components, at least one normal one.
fn is_contained(destination: &Path) -> bool {
    let mut has_normal = false;
    for component in destination.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}

impl SyncManifest {
    /// Build a manifest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RelativeSource` if a source is not absolute and
    /// `ConfigError::DestinationEscape` if a destination is absolute, empty,
    /// or contains `..`.
    pub fn new(entries: Vec<SyncMapping>) -> Result<Self, ConfigError> {
        for entry in &entries {
            if !entry.source.is_absolute() {
                return Err(ConfigError::RelativeSource {
                    source_path: entry.source.clone(),
                });
            }
            if !is_contained(&entry.destination) {
                return Err(ConfigError::DestinationEscape {
                    destination: entry.destination.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[SyncMapping] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What happened to one manifest entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncOutcome {
    /// Copied over the destination.
    Synced,
    /// Dry run: would have been copied.
    WouldSync,
    /// Source file name matched a blocked pattern; nothing was read.
    Blocked,
    /// Source file does not exist.
    Missing,
    /// Reading the source or writing the destination failed.
    Failed(String),
}

/// Result for one manifest entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct SyncEntryResult {
    pub source: PathBuf,
    /// Destination resolved against the destination root.
    pub destination: PathBuf,
    pub outcome: SyncOutcome,
}

/// Result of a sync run, one entry per manifest entry in manifest order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct SyncReport {
    pub entries: Vec<SyncEntryResult>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Entries copied (or, in a dry run, that would have been copied).
    #[must_use]
    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Synced | SyncOutcome::WouldSync))
    }

    #[must_use]
    pub fn blocked(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Blocked))
    }

    #[must_use]
    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Missing))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed(_)))
    }

    /// Whether every non-blocked entry was synced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing() == 0 && self.failed() == 0
    }
}

fn copy_verbatim(source: &Path, destination: &Path) -> Result<(), String> {
    let content =
        fs::read(source).map_err(|e| format!("Failed to read {}: {e}", source.display()))?;
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    fs::write(destination, content)
        .map_err(|e| format!("Failed to write {}: {e}", destination.display()))
}

fn sync_entry(entry: &SyncMapping, config: &SyncConfig) -> SyncEntryResult {
    let destination = config.destination_root.join(&entry.destination);

    let outcome = if config.blocklist.is_blocked_path(&entry.source) {
        SyncOutcome::Blocked
    } else if !entry.source.exists() {
        SyncOutcome::Missing
    } else if config.dry_run {
        SyncOutcome::WouldSync
    } else {
        match copy_verbatim(&entry.source, &destination) {
            Ok(()) => SyncOutcome::Synced,
            Err(message) => {
                tracing::warn!(source = %entry.source.display(), "{message}");
                SyncOutcome::Failed(message)
            }
        }
    };

    tracing::debug!(
        source = %entry.source.display(),
        destination = %destination.display(),
        outcome = ?outcome,
        "sync entry"
    );

    SyncEntryResult {
        source: entry.source.clone(),
        destination,
        outcome,
    }
}

/// Sync every manifest entry.
///
/// Never fails as a whole: per-entry problems are recorded in the report and
/// the remaining entries are still processed.
#[must_use]
pub fn sync_sources(manifest: &SyncManifest, config: &SyncConfig) -> SyncReport {
    let report = SyncReport {
        entries: manifest
            .entries()
            .iter()
            .map(|entry| sync_entry(entry, config))
            .collect(),
    };

    tracing::info!(
        synced = report.synced(),
        blocked = report.blocked(),
        missing = report.missing(),
        failed = report.failed(),
        dry_run = config.dry_run,
        "sync finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_into(root: &Path) -> SyncConfig {
        SyncConfig {
            destination_root: root.to_path_buf(),
            ..SyncConfig::default()
        }
    }

    #[test]
    fn test_manifest_rejects_escaping_destinations() {
        for dest in ["../outside.md", "/etc/passwd", "docs/../../x.md", "", "."] {
            let result = SyncManifest::new(vec![SyncMapping::new("/src/a.md", dest)]);
            assert!(
                matches!(result, Err(ConfigError::DestinationEscape { .. })),
                "{dest:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_manifest_rejects_relative_source() {
        let result = SyncManifest::new(vec![SyncMapping::new("src/a.md", "docs/a.md")]);
        assert!(matches!(result, Err(ConfigError::RelativeSource { .. })));
    }

    #[test]
    fn test_manifest_accepts_nested_destination() {
        let manifest =
            SyncManifest::new(vec![SyncMapping::new("/src/a.md", "./docs/project/a.md")]).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_outcomes_per_entry() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("README.md"), "# Readme\n").unwrap();
        fs::write(src.path().join("SESSION_NOTES.md"), "junk").unwrap();

        let manifest = SyncManifest::new(vec![
            SyncMapping::new(src.path().join("README.md"), "docs/readme.md"),
            SyncMapping::new(src.path().join("SESSION_NOTES.md"), "docs/notes.md"),
            SyncMapping::new(src.path().join("GONE.md"), "docs/gone.md"),
        ])
        .unwrap();

        let report = sync_sources(&manifest, &config_into(dst.path()));

        let outcomes: Vec<_> = report.entries.iter().map(|e| e.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![SyncOutcome::Synced, SyncOutcome::Blocked, SyncOutcome::Missing]
        );
        assert_eq!(report.synced(), 1);
        assert_eq!(report.blocked(), 1);
        assert_eq!(report.missing(), 1);
        assert!(!report.is_complete());
        assert!(!dst.path().join("docs/notes.md").exists());
        assert!(!dst.path().join("docs/gone.md").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("guide.md"), "x").unwrap();
        let manifest =
            SyncManifest::new(vec![SyncMapping::new(src.path().join("guide.md"), "guide.md")])
                .unwrap();

        let mut config = config_into(dst.path());
        config.dry_run = true;
        let report = sync_sources(&manifest, &config);

        assert_eq!(report.entries[0].outcome, SyncOutcome::WouldSync);
        assert_eq!(report.synced(), 1);
        assert!(!dst.path().join("guide.md").exists());
    }

    #[test]
    fn test_unreadable_source_is_failed_not_fatal() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file.
        fs::create_dir(src.path().join("folder.md")).unwrap();
        fs::write(src.path().join("ok.md"), "ok").unwrap();
        let manifest = SyncManifest::new(vec![
            SyncMapping::new(src.path().join("folder.md"), "a.md"),
            SyncMapping::new(src.path().join("ok.md"), "b.md"),
        ])
        .unwrap();

        let report = sync_sources(&manifest, &config_into(dst.path()));

        assert!(matches!(report.entries[0].outcome, SyncOutcome::Failed(_)));
        assert_eq!(report.entries[1].outcome, SyncOutcome::Synced);
        assert_eq!(report.failed(), 1);
    }
}
