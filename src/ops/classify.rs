use serde::Serialize;

use crate::model::config::Policy;
use crate::model::transaction::{Change, Transaction, UserEvent};

/// Annotation key under which the engine tags its own follow-up edits
pub const STATUS_CHANGE_ANNOTATION: &str = "task-status-change";
/// Namespace shared by every annotation value the engine writes
pub const ENGINE_NAMESPACE: &str = "parent-status";

/// Why a transaction is not analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The document did not change
    Unchanged,
    /// Parent completion is turned off
    Disabled,
    /// The transaction carries the engine's own annotation
    SelfAuthored,
    /// Paste or programmatic replacement
    BulkEdit,
    /// Deleted text re-inserted elsewhere
    Move,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::Unchanged => "document unchanged",
            SkipReason::Disabled => "propagation disabled",
            SkipReason::SelfAuthored => "self-authored edit",
            SkipReason::BulkEdit => "paste or bulk replacement",
            SkipReason::Move => "looks like a move",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(SkipReason),
}

/// Decide whether a transaction should be analyzed for a status change
pub fn classify(tr: &Transaction, policy: &Policy) -> Eligibility {
    let reason = if !tr.doc_changed() {
        SkipReason::Unchanged
    } else if policy.is_disabled() {
        SkipReason::Disabled
    } else if is_self_authored(tr) {
        SkipReason::SelfAuthored
    } else if tr.is_user_event(&UserEvent::Paste) || tr.is_user_event(&UserEvent::Set) {
        SkipReason::BulkEdit
    } else if is_move(tr) {
        SkipReason::Move
    } else {
        return Eligibility::Eligible;
    };
    Eligibility::Ineligible(reason)
}

fn is_self_authored(tr: &Transaction) -> bool {
    tr.annotations()
        .get_all(STATUS_CHANGE_ANNOTATION)
        .iter()
        .any(|value| value.contains(ENGINE_NAMESPACE))
}

/// Some deletion and some insertion carry the same non-blank lines, ignoring
/// surrounding whitespace: the user reordered text rather than edited a status.
pub fn is_move(tr: &Transaction) -> bool {
    let changes = tr.host_changes();
    let deletions: Vec<Vec<&str>> = changes
        .iter()
        .filter(|c| c.is_deletion())
        .filter_map(|c| deleted_text(tr, c))
        .map(content_lines)
        .collect();
    let insertions: Vec<Vec<&str>> = changes
        .iter()
        .filter(|c| c.is_insertion())
        .map(|c| content_lines(&c.inserted))
        .collect();

    deletions.iter().any(|deleted| {
        !deleted.is_empty() && insertions.iter().any(|inserted| inserted == deleted)
    })
}

fn deleted_text<'a>(tr: &'a Transaction, change: &Change) -> Option<&'a str> {
    tr.old_doc().slice(change.from_old..change.to_old)
}

/// Trimmed non-blank lines
fn content_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
