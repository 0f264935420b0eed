//! Per-document checks.
//!
//! `check_document` is pure: it only looks at the file name and the content
//! it is given, so the same input always yields the same errors.

use std::path::Path;

use crate::config::ValidationConfig;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::frontmatter::Frontmatter;
use crate::links::find_link_problems;

/// Check one markdown document.
///
/// Order of checks:
/// 1. the file name against the blocklist (at most one error);
/// 2. frontmatter presence; when absent, field checks are skipped;
/// 3. each required field as a `field:` line prefix inside the block;
/// 4. inline links in the body, when enabled.
#[must_use]
pub fn check_document(path: &Path, content: &str, config: &ValidationConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if config.blocklist.is_blocked(&file_name) {
        errors.push(ValidationError::file_level(
            path,
            ValidationErrorKind::JunkFilenameDetected,
            format!("Junk doc detected: {file_name}"),
        ));
    }

    let body_start = match Frontmatter::extract(content) {
        None => {
            errors.push(ValidationError::file_level(
                path,
                ValidationErrorKind::MissingFrontmatter,
                "Missing frontmatter".to_owned(),
            ));
            0
        }
        Some(frontmatter) => {
            for field in frontmatter.missing_fields(&config.required_fields) {
                errors.push(ValidationError::file_level(
                    path,
                    ValidationErrorKind::MissingFrontmatterField,
                    format!("Missing frontmatter: {field}"),
                ));
            }
            frontmatter.closing_line
        }
    };

    if config.check_links {
        let body = content.lines().skip(body_start).collect::<Vec<_>>().join("\n");
        for problem in find_link_problems(&body, body_start + 1) {
            errors.push(ValidationError {
                file: path.to_owned(),
                kind: ValidationErrorKind::MalformedLink,
                line: problem.line,
                message: format!("Malformed link: {} [{}]", problem.reason, problem.raw),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocklist::Blocklist;

    fn check(name: &str, content: &str) -> Vec<ValidationError> {
        check_document(Path::new(name), content, &ValidationConfig::default())
    }

    fn messages(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_clean_document() {
        let errors = check("docs/guide.md", "---\ntitle: X\n---\ncontent");
        assert!(errors.is_empty(), "Unexpected errors: {errors:?}");
    }

    #[test]
    fn test_junk_filename_reported_once() {
        // Matches SESSION, STATUS and SUMMARY.
        let errors = check("SESSION_STATUS_SUMMARY.md", "---\ntitle: X\n---\n");
        let junk: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::JunkFilenameDetected)
            .collect();
        assert_eq!(junk.len(), 1);
        assert_eq!(junk[0].message, "Junk doc detected: SESSION_STATUS_SUMMARY.md");
    }

    #[test]
    fn test_junk_filename_regardless_of_content() {
        let errors = check("docs/SESSION_NOTES.md", "no frontmatter here");
        assert_eq!(
            messages(&errors),
            vec!["Junk doc detected: SESSION_NOTES.md", "Missing frontmatter"]
        );
    }

    #[test]
    fn test_missing_frontmatter_skips_field_checks() {
        let errors = check("docs/guide.md", "# Guide\n\ntext\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingFrontmatter);
    }

    #[test]
    fn test_empty_block_missing_title() {
        let errors = check("docs/guide.md", "---\n---\ncontent");
        assert_eq!(messages(&errors), vec!["Missing frontmatter: title"]);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingFrontmatterField);
    }

    #[test]
    fn test_strict_variant_requires_description() {
        let mut config = ValidationConfig::default();
        config.use_strict_frontmatter();
        let errors = check_document(Path::new("a.md"), "---\ntitle: X\n---\n", &config);
        assert_eq!(messages(&errors), vec!["Missing frontmatter: description"]);
    }

    #[test]
    fn test_each_missing_field_is_separate_error() {
        let mut config = ValidationConfig::default();
        config.use_strict_frontmatter();
        let errors = check_document(Path::new("a.md"), "---\nlayout: home\n---\n", &config);
        assert_eq!(
            messages(&errors),
            vec!["Missing frontmatter: title", "Missing frontmatter: description"]
        );
    }

    #[test]
    fn test_link_errors_carry_document_line_numbers() {
        let errors = check("docs/guide.md", "---\ntitle: X\n---\n\nSee [setup]().\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MalformedLink);
        assert_eq!(errors[0].line, 5);
        assert_eq!(errors[0].message, "Malformed link: empty target [[setup]()]");
    }

    #[test]
    fn test_link_checks_can_be_disabled() {
        let mut config = ValidationConfig::default();
        config.check_links = false;
        let errors = check_document(
            Path::new("guide.md"),
            "---\ntitle: X\n---\n[bad]()\n",
            &config,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_links_in_frontmatter_ignored() {
        let errors = check("guide.md", "---\ntitle: \"[x]()\"\n---\nbody\n");
        assert!(errors.is_empty(), "Unexpected errors: {errors:?}");
    }

    #[test]
    fn test_custom_blocklist() {
        let mut config = ValidationConfig::default();
        config.blocklist = Blocklist::new(&["DRAFT"]).unwrap();
        let errors = check_document(Path::new("STATUS.md"), "---\ntitle: X\n---\n", &config);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_is_deterministic() {
        let content = "---\n---\n[a]()\n[b](c d)\n";
        let first = check("SESSION.md", content);
        let second = check("SESSION.md", content);
        assert_eq!(first, second);
    }
}
