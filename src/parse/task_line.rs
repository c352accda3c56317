use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::{Indent, IndentKind, TaskLine};

/// A not-started task right after a newline inside inserted text
static NEW_TASK_AFTER_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:[-*]|[0-9]+\.) \[ \]").expect("valid regex"));

/// A not-started task at the very start of inserted text
static NEW_TASK_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*]|[0-9]+\.) \[ \]").expect("valid regex"));

/// Leading spaces and tabs of a line
pub fn leading_whitespace(text: &str) -> &str {
    let rest = text.trim_start_matches([' ', '\t']);
    &text[..text.len() - rest.len()]
}

/// Measure a line's indentation
pub fn indent_of(text: &str) -> Indent {
    let ws = leading_whitespace(text);
    let kind = match (ws.contains(' '), ws.contains('\t')) {
        (false, false) => IndentKind::None,
        (true, false) => IndentKind::Spaces,
        (false, true) => IndentKind::Tabs,
        (true, true) => IndentKind::Mixed,
    };
    Indent {
        width: ws.len(),
        kind,
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Headings and blockquotes do not block parent lookup. Only unindented
/// markers count; an indented `> quote` is ordinary content.
pub fn is_structural(text: &str) -> bool {
    text.starts_with('#') || text.starts_with('>')
}

/// Parse a task line: indentation, a list marker (`-`, `*` or `1.`), one
/// space, then `[`, a status character and `]`.
pub fn parse_task_line(text: &str) -> Option<TaskLine> {
    let indent = indent_of(text);
    let content = &text[indent.width..];
    let after_bracket = strip_list_marker(content)?.strip_prefix(" [")?;

    let mut chars = after_bracket.chars();
    let status = chars.next()?;
    if chars.next() != Some(']') {
        return None;
    }

    Some(TaskLine {
        indent,
        status,
        status_offset: text.len() - after_bracket.len(),
    })
}

fn strip_list_marker(content: &str) -> Option<&str> {
    if let Some(rest) = content.strip_prefix(['-', '*']) {
        return Some(rest);
    }
    let digits = content.len() - content.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    content[digits..].strip_prefix('.')
}

/// Offset, within `inserted`, of the first character of a newly inserted
/// not-started task line.
pub fn find_new_task(inserted: &str) -> Option<usize> {
    if let Some(m) = NEW_TASK_AFTER_NEWLINE.find(inserted) {
        return Some(m.start() + 1);
    }
    NEW_TASK_AT_START.find(inserted).map(|m| m.start())
}
