use serde::Serialize;

use crate::model::document::Document;
use crate::parse::task_line::{indent_of, is_blank, is_structural, parse_task_line};

/// The nearest ancestor task of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentTask {
    pub line_number: usize,
    pub indent_width: usize,
}

/// Walk backward from `line_number` to the nearest task with strictly
/// smaller indentation.
///
/// Blank lines and lines at the same or deeper indentation are passed over.
/// Lines indented with an incompatible whitespace kind are skipped rather
/// than compared. Unindented headings and blockquotes are transparent;
/// any other shallower non-task line ends the search.
pub fn find_parent(doc: &Document, line_number: usize) -> Option<ParentTask> {
    let current = indent_of(doc.line(line_number)?.text);
    if current.width == 0 {
        return None;
    }

    for i in (1..line_number).rev() {
        let Some(line) = doc.line(i) else {
            continue;
        };
        if is_blank(line.text) {
            continue;
        }

        let indent = indent_of(line.text);
        if indent.width > 0 && !current.kind.comparable_with(indent.kind) {
            continue;
        }
        if indent.width >= current.width {
            continue;
        }

        if parse_task_line(line.text).is_some() {
            return Some(ParentTask {
                line_number: i,
                indent_width: indent.width,
            });
        }
        if !is_structural(line.text) {
            return None;
        }
    }

    None
}
