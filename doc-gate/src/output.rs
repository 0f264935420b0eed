//! Shared output formatting for validation and sync reports.
//!
//! Provides JSON and plain-text formatters. Color is left to the CLI layer.

use std::io::Write;

use crate::report::ValidationReport;
use crate::sync::{SyncOutcome, SyncReport};

const CROSS: &str = "\u{274c}";
const CHECK: &str = "\u{2705}";
const WARNING: &str = "\u{26a0}\u{fe0f}";
const PREVIEW: &str = "\u{1f50d}";

/// Format a report as pretty JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<T: serde::Serialize>(report: &T, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// The final verdict line of a validation run.
#[must_use]
pub fn validation_summary(report: &ValidationReport) -> String {
    if report.ok {
        format!("{CHECK} All docs validated")
    } else {
        format!("{CROSS} Validation failed: {} errors", report.total_errors())
    }
}

/// Write the per-file error listing: one `❌ <path>:` header per failing file
/// followed by its errors, scan errors under their own header, then the file
/// counts. The verdict line is not included.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_error_listing(
    report: &ValidationReport,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    for (file, errors) in report.errors_by_file() {
        writeln!(writer, "{CROSS} {}:", file.display())?;
        for error in errors {
            writeln!(writer, "   {}", error.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    if !report.scan_errors.is_empty() {
        writeln!(writer, "{CROSS} Files that could not be checked:")?;
        for scan_err in &report.scan_errors {
            writeln!(writer, "   {}", scan_err.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    writeln!(
        writer,
        "Checked {} of {} markdown file(s)",
        report.checked_files, report.discovered_files
    )?;
    Ok(())
}

/// Format a `ValidationReport` as plain text: the error listing followed by
/// the verdict line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    write_error_listing(report, writer)?;
    writeln!(writer, "{}", validation_summary(report))?;
    Ok(())
}

/// The one-line description of a sync entry, e.g. `✅ Synced: a.md -> docs/a.md`.
#[must_use]
pub fn sync_entry_line(outcome: &SyncOutcome, source: &str, destination: &str) -> String {
    match outcome {
        SyncOutcome::Synced => format!("{CHECK} Synced: {source} -> {destination}"),
        SyncOutcome::WouldSync => format!("{PREVIEW} Would sync: {source} -> {destination}"),
        SyncOutcome::Blocked => format!("{CROSS} Blocked: {source}"),
        SyncOutcome::Missing => format!("{WARNING} Missing: {source}"),
        SyncOutcome::Failed(message) => format!("{CROSS} Failed: {source} ({message})"),
    }
}

/// The summary line of a sync run.
#[must_use]
pub fn sync_summary(report: &SyncReport) -> String {
    format!(
        "Synced: {}, Blocked: {}, Missing: {}, Failed: {}",
        report.synced(),
        report.blocked(),
        report.missing(),
        report.failed()
    )
}

/// Write one line per sync entry.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sync_entries(report: &SyncReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    for entry in &report.entries {
        let line = sync_entry_line(
            &entry.outcome,
            &entry.source.display().to_string(),
            &entry.destination.display().to_string(),
        );
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Format a `SyncReport` as plain text: one line per entry, then the counts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sync_human(report: &SyncReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    write_sync_entries(report, writer)?;
    writeln!(writer)?;
    writeln!(writer, "{}", sync_summary(report))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_entry_lines() {
        assert_eq!(
            sync_entry_line(&SyncOutcome::Synced, "/a/README.md", "docs/readme.md"),
            "\u{2705} Synced: /a/README.md -> docs/readme.md"
        );
        assert_eq!(
            sync_entry_line(&SyncOutcome::Blocked, "/a/STATUS.md", "docs/s.md"),
            "\u{274c} Blocked: /a/STATUS.md"
        );
        assert!(sync_entry_line(&SyncOutcome::Missing, "/a/x.md", "x.md").contains("Missing: /a/x.md"));
        assert!(
            sync_entry_line(&SyncOutcome::Failed("denied".to_owned()), "/a/x.md", "x.md")
                .ends_with("(denied)")
        );
    }

    #[test]
    fn test_empty_sync_summary() {
        assert_eq!(
            sync_summary(&SyncReport::default()),
            "Synced: 0, Blocked: 0, Missing: 0, Failed: 0"
        );
    }
}
