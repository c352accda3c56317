use serde::Serialize;
use tracing::debug;

use crate::model::config::Policy;
use crate::model::document::Document;
use crate::model::transaction::{Change, Transaction};
use crate::ops::aggregate::{ChildSummary, aggregate};
use crate::ops::classify::{Eligibility, STATUS_CHANGE_ANNOTATION, SkipReason, classify};
use crate::ops::detect::find_status_change;
use crate::ops::hierarchy::{ParentTask, find_parent};
use crate::ops::workflow::HostContext;
use crate::parse::task_line::parse_task_line;

/// Annotation value for a parent completed by the engine
pub const ANNOTATION_COMPLETE: &str = "parent-status.complete";
/// Annotation value for a parent marked in progress by the engine
pub const ANNOTATION_IN_PROGRESS: &str = "parent-status.in-progress";

/// What to do with the parent of a changed task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "kebab-case")]
pub enum Action {
    None,
    CompleteParent,
    MarkInProgress(char),
}

impl Action {
    /// Status character to write, if any
    pub fn target(self, policy: &Policy) -> Option<char> {
        match self {
            Action::None => None,
            Action::CompleteParent => Some(policy.statuses.completed_char()),
            Action::MarkInProgress(marker) => Some(marker),
        }
    }

    pub fn annotation(self) -> Option<&'static str> {
        match self {
            Action::None => None,
            Action::CompleteParent => Some(ANNOTATION_COMPLETE),
            Action::MarkInProgress(_) => Some(ANNOTATION_IN_PROGRESS),
        }
    }
}

/// Choose an action for the parent at `parent_line` given its children.
/// The parent's current status is read from `doc`.
pub fn decide(doc: &Document, parent_line: usize, policy: &Policy, summary: &ChildSummary) -> Action {
    let Some(current) = parent_status(doc, parent_line) else {
        return Action::None;
    };
    let statuses = &policy.statuses;

    if policy.auto_complete_parent && summary.all_completed {
        return if statuses.is_completed(current) {
            Action::None
        } else {
            Action::CompleteParent
        };
    }

    if policy.mark_in_progress_on_partial {
        let marker = statuses.in_progress_char();
        let started = statuses.is_not_started(current) && summary.any_has_status;
        let regressed =
            statuses.is_completed(current) && !summary.all_completed && summary.has_any_child;
        if (started || regressed) && current != marker {
            return Action::MarkInProgress(marker);
        }
    }

    Action::None
}

/// Status character of the task at `line_number`
pub fn parent_status(doc: &Document, line_number: usize) -> Option<char> {
    doc.line(line_number)
        .and_then(|line| parse_task_line(line.text))
        .map(|task| task.status)
}

/// The parent update the engine appends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    pub child_line: usize,
    pub parent: ParentTask,
    pub summary: ChildSummary,
    pub action: Action,
    pub change: Change,
}

/// Result of analyzing one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Skipped { reason: SkipReason },
    NoStatusChange,
    NoParent { child_line: usize },
    /// The parent already reflects its children
    NoAction {
        child_line: usize,
        parent: ParentTask,
        summary: ChildSummary,
    },
    /// Another change in the transaction already touches the parent's status
    Conflict { child_line: usize, parent: ParentTask },
    Updated(Update),
}

/// Run the full pipeline on a transaction without modifying it
pub fn analyze(tr: &Transaction, ctx: &HostContext<'_>, policy: &Policy) -> Outcome {
    if let Eligibility::Ineligible(reason) = classify(tr, policy) {
        return Outcome::Skipped { reason };
    }
    let Some(child_line) = find_status_change(tr) else {
        return Outcome::NoStatusChange;
    };

    let doc = tr.new_doc();
    let Some(parent) = find_parent(doc, child_line) else {
        return Outcome::NoParent { child_line };
    };

    let summary = aggregate(doc, parent.line_number, parent.indent_width, ctx, policy);
    let action = decide(doc, parent.line_number, policy, &summary);
    let Some(target) = action.target(policy) else {
        return Outcome::NoAction {
            child_line,
            parent,
            summary,
        };
    };

    let Some((from, to)) = status_range(doc, parent.line_number) else {
        return Outcome::NoAction {
            child_line,
            parent,
            summary,
        };
    };
    let touched = tr
        .host_changes()
        .iter()
        .any(|c| c.from_new <= from && from < c.to_new);
    if touched {
        return Outcome::Conflict { child_line, parent };
    }

    Outcome::Updated(Update {
        child_line,
        parent,
        summary,
        action,
        change: Change::replace(from, to, target.to_string()),
    })
}

/// Byte range of the status character of the task at `line_number`
fn status_range(doc: &Document, line_number: usize) -> Option<(usize, usize)> {
    let line = doc.line(line_number)?;
    let task = parse_task_line(line.text)?;
    let from = line.start + task.status_offset;
    Some((from, from + task.status.len_utf8()))
}

/// Transaction hook: returns `tr` unchanged, or `tr` with one appended
/// change that updates the parent of the task whose status changed.
pub fn handle_transaction(tr: Transaction, ctx: &HostContext<'_>, policy: &Policy) -> Transaction {
    let outcome = analyze(&tr, ctx, policy);
    apply_outcome(tr, &outcome)
}

/// Append the parent update of an `outcome` previously computed by
/// [`analyze`] for the same transaction. Other outcomes leave `tr` as is.
pub fn apply_outcome(tr: Transaction, outcome: &Outcome) -> Transaction {
    match outcome {
        Outcome::Updated(update) => {
            debug!(
                child = update.child_line,
                parent = update.parent.line_number,
                action = ?update.action,
                "updating parent task status"
            );
            match update.action.annotation() {
                Some(value) => {
                    tr.with_followup(update.change.clone(), STATUS_CHANGE_ANNOTATION, value)
                }
                None => tr,
            }
        }
        outcome => {
            debug!(?outcome, "leaving transaction unchanged");
            tr
        }
    }
}
