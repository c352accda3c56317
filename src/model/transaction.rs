use indexmap::IndexMap;
use serde::Serialize;

use crate::model::document::Document;

/// How the host classified the user action behind a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// Ordinary typing
    Typed,
    /// Clipboard paste
    Paste,
    /// Backspace/delete keys
    Delete,
    /// Programmatic replacement of the document (reload, bulk set)
    Set,
    Other(String),
}

/// One atomic replacement: `[from_old, to_old)` in the old document became
/// `inserted`, which occupies `[from_new, to_new)` in the new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub from_old: usize,
    pub to_old: usize,
    pub from_new: usize,
    pub to_new: usize,
    pub inserted: String,
}

impl Change {
    /// Replace `[from, to)` of a document with `insert`, where the change is
    /// the only one applied to that document
    pub fn replace(from: usize, to: usize, insert: impl Into<String>) -> Self {
        let inserted = insert.into();
        Change {
            from_old: from,
            to_old: to,
            from_new: from,
            to_new: from + inserted.len(),
            inserted,
        }
    }

    /// Removes text from the old document
    pub fn is_deletion(&self) -> bool {
        self.from_old < self.to_old
    }

    /// Adds text to the new document
    pub fn is_insertion(&self) -> bool {
        !self.inserted.is_empty()
    }
}

/// A host-side edit request against the old document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Edit {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Edit {
            from,
            to,
            insert: insert.into(),
        }
    }
}

/// Error building a transaction from edits
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },
    #[error("edit {from}..{to} does not fall on character boundaries")]
    NotCharBoundary { from: usize, to: usize },
    #[error("edit {from}..{to} overlaps an earlier edit")]
    Overlapping { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(at: usize) -> Self {
        Selection {
            anchor: at,
            head: at,
        }
    }
}

/// Ordered multimap of opaque tags attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: IndexMap<String, Vec<String>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// First value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

/// An atomic proposed edit: both document revisions, the changes between
/// them, and the metadata the host attached.
///
/// Host changes are simultaneous, all expressed in old-document
/// coordinates. Changes appended afterwards with [`Transaction::with_followup`]
/// are sequential: each is expressed against `new_doc` as modified by the
/// follow-ups before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    old_doc: Document,
    new_doc: Document,
    changes: Vec<Change>,
    /// Index of the first follow-up in `changes`
    host_len: usize,
    selection: Option<Selection>,
    user_event: Option<UserEvent>,
    annotations: Annotations,
}

impl Transaction {
    /// Assemble a transaction from parts the host has already computed
    pub fn new(old_doc: Document, new_doc: Document, changes: Vec<Change>) -> Self {
        let host_len = changes.len();
        Transaction {
            old_doc,
            new_doc,
            changes,
            host_len,
            selection: None,
            user_event: None,
            annotations: Annotations::new(),
        }
    }

    /// Apply non-overlapping edits (in any order) to `old_doc`
    pub fn from_edits(old_doc: Document, mut edits: Vec<Edit>) -> Result<Self, EditError> {
        edits.sort_by_key(|e| (e.from, e.to));
        let old = old_doc.text();
        let mut text = String::with_capacity(old.len());
        let mut changes = Vec::with_capacity(edits.len());
        let mut cursor = 0;

        for edit in edits {
            let (from, to) = (edit.from, edit.to);
            if from > to || to > old.len() {
                return Err(EditError::OutOfBounds {
                    from,
                    to,
                    len: old.len(),
                });
            }
            if !old.is_char_boundary(from) || !old.is_char_boundary(to) {
                return Err(EditError::NotCharBoundary { from, to });
            }
            if from < cursor {
                return Err(EditError::Overlapping { from, to });
            }
            text.push_str(&old[cursor..from]);
            let from_new = text.len();
            text.push_str(&edit.insert);
            changes.push(Change {
                from_old: from,
                to_old: to,
                from_new,
                to_new: text.len(),
                inserted: edit.insert,
            });
            cursor = to;
        }
        text.push_str(&old[cursor..]);

        Ok(Transaction::new(old_doc, Document::new(text), changes))
    }

    /// Describe the difference between two revisions as a single change
    /// spanning everything between their common prefix and suffix
    pub fn from_texts(old_doc: Document, new_doc: Document) -> Self {
        let (old, new) = (old_doc.text(), new_doc.text());
        let mut prefix = old
            .bytes()
            .zip(new.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(prefix) || !new.is_char_boundary(prefix) {
            prefix -= 1;
        }
        let max_suffix = old.len().min(new.len()) - prefix;
        let mut suffix = old
            .bytes()
            .rev()
            .zip(new.bytes().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(old.len() - suffix) || !new.is_char_boundary(new.len() - suffix)
        {
            suffix -= 1;
        }

        let changes = if old == new {
            Vec::new()
        } else {
            vec![Change {
                from_old: prefix,
                to_old: old.len() - suffix,
                from_new: prefix,
                to_new: new.len() - suffix,
                inserted: new[prefix..new.len() - suffix].to_string(),
            }]
        };
        Transaction::new(old_doc, new_doc, changes)
    }

    pub fn with_user_event(mut self, event: UserEvent) -> Self {
        self.user_event = Some(event);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key, value);
        self
    }

    /// Append a sequential change against the current committed state,
    /// tagged with an annotation
    pub fn with_followup(
        mut self,
        change: Change,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.changes.push(change);
        self.annotations.insert(key, value);
        self
    }

    pub fn old_doc(&self) -> &Document {
        &self.old_doc
    }

    pub fn new_doc(&self) -> &Document {
        &self.new_doc
    }

    /// Every change, host changes first, follow-ups after
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// The simultaneous changes that turn `old_doc` into `new_doc`
    pub fn host_changes(&self) -> &[Change] {
        &self.changes[..self.host_len]
    }

    pub fn followups(&self) -> &[Change] {
        &self.changes[self.host_len..]
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn user_event(&self) -> Option<&UserEvent> {
        self.user_event.as_ref()
    }

    pub fn is_user_event(&self, kind: &UserEvent) -> bool {
        self.user_event.as_ref() == Some(kind)
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key)
    }

    pub fn doc_changed(&self) -> bool {
        self.old_doc != self.new_doc
    }

    /// `new_doc` with every follow-up applied. Follow-ups that no longer fit
    /// the text are dropped.
    pub fn committed_doc(&self) -> Document {
        if self.followups().is_empty() {
            return self.new_doc.clone();
        }
        let mut text = self.new_doc.text().to_string();
        for change in self.followups() {
            let fits = change.from_old <= change.to_old
                && text.is_char_boundary(change.from_old)
                && text.is_char_boundary(change.to_old)
                && change.to_old <= text.len();
            if fits {
                text.replace_range(change.from_old..change.to_old, &change.inserted);
            }
        }
        Document::new(text)
    }
}
