//! Superficial inline-link checks for markdown.
//!
//! Only `[text](target)` links in prose are looked at. Fenced code blocks
//! (``` and ~~~ fences, `CommonMark` style) and inline code spans are skipped. A link is
//! malformed when its target is empty or contains whitespace outside a
//! `<...>` wrapper and outside an optional `"title"` suffix.

use std::sync::LazyLock;

use regex::Regex;

/// Inline link: optional `!` for images, bracketed text, parenthesised target.
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"!?\[([^\]]*)\]\(([^)]*)\)") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid link regex: {err}"),
    }
});

/// Inline code span (single or double backticks).
static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"``[^`]*``|`[^`]*`") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid code span regex: {err}"),
});

/// Link target followed by an optional quoted title.
static TARGET_WITH_TITLE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r#"^(\S+)\s+(?:"[^"]*"|'[^']*')$"#) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid link title regex: {err}"),
    });

/// A malformed link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProblem {
    /// 1-based line number.
    pub line: usize,
    /// The link text as written, e.g. `[guide]( )`.
    pub raw: String,
    /// Short reason.
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkdownState {
    Prose,
    FencedBlock {
        fence_char: char,
        opening_fence_len: usize,
    },
}

fn parse_fence(trimmed_line: &str) -> Option<(char, usize)> {
    let fence_char = match trimmed_line.as_bytes().first() {
        Some(b'`') => '`',
        Some(b'~') => '~',
        _ => return None,
    };

    let fence_len = trimmed_line
        .chars()
        .take_while(|&c| c == fence_char)
        .count();
    if fence_len >= 3 {
        Some((fence_char, fence_len))
    } else {
        None
    }
}

fn target_problem(target: &str) -> Option<&'static str> {
    let target = target.trim();
    if target.is_empty() || target == "<>" {
        return Some("empty target");
    }
    if target.starts_with('<') {
        return if target.ends_with('>') {
            None
        } else {
            Some("unterminated angle-bracket target")
        };
    }
    if !target.contains(char::is_whitespace) || TARGET_WITH_TITLE.is_match(target) {
        return None;
    }
    Some("whitespace in target")
}

/// Find malformed inline links. `first_line` is the 1-based number of the
/// first line of `content` within the whole document.
#[must_use]
pub fn find_link_problems(content: &str, first_line: usize) -> Vec<LinkProblem> {
    let mut problems = Vec::new();
    let mut state = MarkdownState::Prose;

    for (idx, line) in content.lines().enumerate() {
        let trimmed_line = line.trim_start();
        if let Some((fence_char, fence_len)) = parse_fence(trimmed_line) {
            match state {
                MarkdownState::Prose => {
                    state = MarkdownState::FencedBlock {
                        fence_char,
                        opening_fence_len: fence_len,
                    };
                    continue;
                }
                MarkdownState::FencedBlock {
                    fence_char: open_fence_char,
                    opening_fence_len,
                } => {
                    if fence_char == open_fence_char && fence_len >= opening_fence_len {
                        state = MarkdownState::Prose;
                        continue;
                    }
                }
            }
        }

        if let MarkdownState::FencedBlock { .. } = state {
            continue;
        }

        let prose = CODE_SPAN.replace_all(line, "");
        for caps in INLINE_LINK.captures_iter(&prose) {
            let target = caps.get(2).map_or("", |m| m.as_str());
            if let Some(reason) = target_problem(target) {
                problems.push(LinkProblem {
                    line: first_line + idx,
                    raw: caps.get(0).map_or("", |m| m.as_str()).to_owned(),
                    reason,
                });
            }
        }
    }

    problems
}
