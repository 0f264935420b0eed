//! Frontmatter block extraction.
//!
//! A block exists only when the very first line of the document is `---` and a
//! later line is `---` again. Trailing whitespace (including the `\r` of CRLF
//! files) is ignored on delimiter lines. An empty block (`---` directly
//! followed by `---`) is a present block with no lines.

const DELIMITER: &str = "---";

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// The lines between the opening and closing delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    lines: Vec<&'a str>,
    /// 1-based line number of the closing delimiter.
    pub closing_line: usize,
}

impl<'a> Frontmatter<'a> {
    /// Extract the leading block, or `None` if the document has none.
    #[must_use]
    pub fn extract(content: &'a str) -> Option<Self> {
        let mut lines = content.lines();
        if !is_delimiter(lines.next()?) {
            return None;
        }

        let mut body = Vec::new();
        for (idx, line) in lines.enumerate() {
            if is_delimiter(line) {
                return Some(Self {
                    lines: body,
                    closing_line: idx + 2,
                });
            }
            body.push(line);
        }
        None
    }

    /// Whether some line of the block starts with `<field>:`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.lines.iter().any(|line| {
            line.strip_prefix(field)
                .is_some_and(|rest| rest.starts_with(':'))
        })
    }

    /// The required fields that no line of the block declares, in the given order.
    #[must_use]
    pub fn missing_fields<'f, S: AsRef<str>>(&self, required: &'f [S]) -> Vec<&'f str> {
        required
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|field| !self.has_field(field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_block() {
        let fm = Frontmatter::extract("---\ntitle: X\n---\ncontent").unwrap();
        assert_eq!(fm.missing_fields(&["title", "description"]), vec!["description"]);
        assert_eq!(fm.closing_line, 3);
        assert!(fm.has_field("title"));
    }

    #[test]
    fn test_extract_empty_block() {
        let fm = Frontmatter::extract("---\n---\ncontent").unwrap();
        assert!(!fm.has_field("title"));
        assert_eq!(fm.missing_fields(&["title"]), vec!["title"]);
    }

    #[test]
    fn test_no_block_without_leading_delimiter() {
        assert!(Frontmatter::extract("# Title\n---\ntitle: X\n---\n").is_none());
        assert!(Frontmatter::extract("").is_none());
        assert!(Frontmatter::extract("\n---\ntitle: X\n---\n").is_none());
    }

    #[test]
    fn test_no_block_without_closing_delimiter() {
        assert!(Frontmatter::extract("---\ntitle: X\ncontent\n").is_none());
    }

    #[test]
    fn test_crlf_delimiters() {
        let fm = Frontmatter::extract("---\r\ntitle: X\r\n---\r\nbody").unwrap();
        assert!(fm.has_field("title"));
    }

    #[test]
    fn test_field_must_be_line_prefix_with_colon() {
        let fm = Frontmatter::extract("---\n  title: nested\ntitles: many\nsubtitle: x\n---\n")
            .unwrap();
        assert!(!fm.has_field("title"));
    }

    #[test]
    fn test_missing_fields_order() {
        let fm = Frontmatter::extract("---\nlayout: doc\n---\n").unwrap();
        let required = vec!["title".to_owned(), "description".to_owned()];
        assert_eq!(fm.missing_fields(&required), vec!["title", "description"]);
    }

    #[test]
    fn test_four_dashes_is_not_a_delimiter() {
        assert!(Frontmatter::extract("----\ntitle: X\n----\n").is_none());
    }
}
