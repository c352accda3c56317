use serde::Serialize;

use crate::ops::aggregate::ChildSummary;
use crate::ops::propagate::{Action, Outcome};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PropagationJson<'a> {
    #[serde(flatten)]
    pub outcome: &'a Outcome,
    /// Document after the edit and any parent update
    pub document: &'a str,
}

#[derive(Serialize)]
pub struct TaskNodeJson {
    pub line: usize,
    pub status: char,
    pub indent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildSummary>,
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One-line description of what happened to a transaction
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Skipped { reason } => format!("skipped: {}", reason),
        Outcome::NoStatusChange => "no task status changed".to_string(),
        Outcome::NoParent { child_line } => format!("line {}: no parent task", child_line),
        Outcome::NoAction {
            child_line, parent, ..
        } => format!(
            "line {}: parent at line {} already up to date",
            child_line, parent.line_number
        ),
        Outcome::Conflict { child_line, parent } => format!(
            "line {}: parent at line {} is already being edited",
            child_line, parent.line_number
        ),
        Outcome::Updated(update) => {
            let what = match update.action {
                Action::CompleteParent => "completed".to_string(),
                Action::MarkInProgress(marker) => format!("marked [{}]", marker),
                Action::None => "unchanged".to_string(),
            };
            format!(
                "line {}: parent at line {} {}",
                update.child_line, update.parent.line_number, what
            )
        }
    }
}

/// Listing row: line number, the task text, its parent line and child state
pub fn format_task_node(node: &TaskNodeJson, text: &str) -> String {
    let parent = node
        .parent
        .map(|p| format!("  <- {}", p))
        .unwrap_or_default();
    let children = match node.children {
        Some(summary) if summary.has_any_child => {
            let state = if summary.all_completed {
                "all done"
            } else if summary.any_has_status {
                "partial"
            } else {
                "not started"
            };
            format!("  ({})", state)
        }
        _ => String::new(),
    };
    format!("{:>4} {}{}{}", node.line, text, parent, children)
}
