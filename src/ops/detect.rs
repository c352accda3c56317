use crate::model::transaction::{Change, Transaction};
use crate::parse::task_line::{find_new_task, parse_task_line};

/// Find the first task line whose status was set or changed by the
/// transaction. Returns its 1-based line number in the new document.
///
/// Only the first hit is reported; a transaction that changes several
/// statuses at once propagates from the earliest change.
pub fn find_status_change(tr: &Transaction) -> Option<usize> {
    tr.host_changes()
        .iter()
        .find_map(|change| inserted_task_line(tr, change).or_else(|| edited_task_line(tr, change)))
}

/// A new, not-started task typed or inserted as part of the change
fn inserted_task_line(tr: &Transaction, change: &Change) -> Option<usize> {
    if change.inserted.is_empty() {
        return None;
    }
    let offset = find_new_task(&change.inserted)?;
    tr.new_doc()
        .line_at(change.from_new + offset)
        .map(|line| line.number)
}

/// The task line at the change position whose status differs from the line
/// at the same position before the edit
fn edited_task_line(tr: &Transaction, change: &Change) -> Option<usize> {
    let line = tr.new_doc().line_at(change.from_new)?;
    let task = parse_task_line(line.text)?;

    let old_status = if change.from_old < tr.old_doc().len() {
        tr.old_doc()
            .line_at(change.from_old)
            .and_then(|old_line| parse_task_line(old_line.text))
            .map(|old_task| old_task.status)
    } else {
        None
    };

    match old_status {
        Some(status) if status == task.status => None,
        _ => Some(line.number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Document;
    use crate::model::transaction::Edit;

    fn edit(old: &str, edits: Vec<Edit>) -> Transaction {
        Transaction::from_edits(Document::new(old), edits).unwrap()
    }

    #[test]
    fn test_no_task_change() {
        let tr = edit("Some text\n", vec![Edit::new(4, 4, " more")]);
        assert_eq!(find_status_change(&tr), None);
    }

    #[test]
    fn test_status_toggle() {
        let tr = edit("- [ ] Parent\n  - [ ] Child", vec![Edit::new(18, 19, "x")]);
        assert_eq!(find_status_change(&tr), Some(2));
    }

    #[test]
    fn test_status_to_in_progress() {
        let tr = edit("- [ ] Task", vec![Edit::new(3, 4, "/")]);
        assert_eq!(find_status_change(&tr), Some(1));
    }

    #[test]
    fn test_title_edit_on_task_line_is_not_a_status_change() {
        let tr = edit("- [ ] Parent\n  - [x] Child", vec![Edit::new(25, 25, "!")]);
        assert_eq!(find_status_change(&tr), None);
    }

    #[test]
    fn test_new_task_after_newline() {
        let tr = edit("- [ ] Parent\n  - [x] Child", vec![Edit::new(26, 26, "\n  - [ ] ")]);
        assert_eq!(tr.new_doc().line(3).unwrap().text, "  - [ ] ");
        assert_eq!(find_status_change(&tr), Some(3));
    }

    #[test]
    fn test_new_task_at_document_start() {
        let tr = edit("- [x] Existing", vec![Edit::new(0, 0, "- [ ] First\n")]);
        assert_eq!(find_status_change(&tr), Some(1));
    }

    #[test]
    fn test_pure_deletion_uses_line_after_deletion() {
        // Deleting a trailing word keeps the line a task with the same status
        let tr = edit("- [x] Done task", vec![Edit::new(10, 15, "")]);
        assert_eq!(find_status_change(&tr), None);
    }

    #[test]
    fn test_deleting_a_dash_is_not_a_status_change() {
        let old = "- [ ] Parent\n  - [x] Child\n  - ";
        let tr = edit(old, vec![Edit::new(29, 31, "")]);
        assert_eq!(tr.new_doc().text(), "- [ ] Parent\n  - [x] Child\n  ");
        assert_eq!(find_status_change(&tr), None);
    }

    #[test]
    fn test_first_change_wins() {
        let tr = edit(
            "- [ ] A\n- [ ] B",
            vec![Edit::new(3, 4, "x"), Edit::new(11, 12, "x")],
        );
        assert_eq!(find_status_change(&tr), Some(1));
    }

    #[test]
    fn test_append_past_old_end_reports_task_line() {
        // Old line cannot be resolved at the end of the old document
        let tr = edit("- [x] Done", vec![Edit::new(10, 10, " now")]);
        assert_eq!(find_status_change(&tr), Some(1));
    }
}
