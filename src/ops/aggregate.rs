use serde::Serialize;

use crate::model::config::Policy;
use crate::model::document::Document;
use crate::ops::workflow::HostContext;
use crate::parse::task_line::{indent_of, is_blank, parse_task_line};

/// State of a parent's direct children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChildSummary {
    /// Every direct child is completed (false when there are no children)
    pub all_completed: bool,
    /// Some direct child has a status other than not-started
    pub any_has_status: bool,
    pub has_any_child: bool,
}

/// Summarize the direct children of the task at `parent_line`.
///
/// Children are the task lines exactly one indent unit deeper than the
/// parent, up to the first non-blank line at or above the parent's
/// indentation. Deeper descendants do not count.
pub fn aggregate(
    doc: &Document,
    parent_line: usize,
    parent_indent: usize,
    ctx: &HostContext<'_>,
    policy: &Policy,
) -> ChildSummary {
    let child_indent = parent_indent + ctx.indent.indent_unit();
    let statuses = &policy.statuses;

    let mut has_any_child = false;
    let mut any_has_status = false;
    let mut all_completed = true;

    for line in doc.lines().skip(parent_line) {
        if is_blank(line.text) {
            continue;
        }
        let width = indent_of(line.text).width;
        if width <= parent_indent {
            break;
        }
        if width != child_indent {
            continue;
        }
        let Some(task) = parse_task_line(line.text) else {
            continue;
        };

        has_any_child = true;
        if !statuses.is_not_started(task.status) {
            any_has_status = true;
        }
        if !statuses.is_completed(task.status) {
            all_completed = false;
        } else if policy.workflow.checks_final_stage()
            && !ctx
                .workflow
                .is_final_stage_or_not_workflow(line.text, line.number, doc, policy)
        {
            all_completed = false;
        }
    }

    ChildSummary {
        all_completed: has_any_child && all_completed,
        any_has_status,
        has_any_child,
    }
}
