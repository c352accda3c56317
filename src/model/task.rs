use serde::Serialize;

/// Which whitespace characters make up a line's indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentKind {
    None,
    Spaces,
    Tabs,
    Mixed,
}

impl IndentKind {
    pub fn has_spaces(self) -> bool {
        matches!(self, IndentKind::Spaces | IndentKind::Mixed)
    }

    pub fn has_tabs(self) -> bool {
        matches!(self, IndentKind::Tabs | IndentKind::Mixed)
    }

    /// Whether a line indented with `self` can be compared against a line
    /// indented with `other`. Every whitespace kind used by `self` must also
    /// appear in `other`.
    pub fn comparable_with(self, other: IndentKind) -> bool {
        !(self.has_spaces() && !other.has_spaces() || self.has_tabs() && !other.has_tabs())
    }
}

/// Leading whitespace of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indent {
    /// Number of leading whitespace characters (a tab counts as one)
    pub width: usize,
    pub kind: IndentKind,
}

impl Indent {
    pub const ZERO: Indent = Indent {
        width: 0,
        kind: IndentKind::None,
    };
}

/// A task line parsed from document text: `- [x] Title`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLine {
    pub indent: Indent,
    /// Character inside the checkbox
    pub status: char,
    /// Byte offset of the status character within the line
    pub status_offset: usize,
}
