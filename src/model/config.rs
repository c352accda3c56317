use serde::{Deserialize, Serialize};

/// Character written when completing a parent and the completed set is empty
pub const DEFAULT_COMPLETED: char = 'x';
/// Character written when marking a parent in progress and the set is empty
pub const DEFAULT_IN_PROGRESS: char = '/';

/// Configuration from cascade.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub policy: Policy,
    #[serde(default)]
    pub indent: IndentSettings,
}

/// What the propagation engine is allowed to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Complete a parent once all of its direct children are completed
    #[serde(default = "default_true")]
    pub auto_complete_parent: bool,
    /// Mark a parent in progress once some, but not all, children have a status
    #[serde(default)]
    pub mark_in_progress_on_partial: bool,
    #[serde(default)]
    pub statuses: TaskStatuses,
    #[serde(default)]
    pub workflow: WorkflowPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            auto_complete_parent: true,
            mark_in_progress_on_partial: false,
            statuses: TaskStatuses::default(),
            workflow: WorkflowPolicy::default(),
        }
    }
}

impl Policy {
    /// Parent completion is off. In-progress marking only runs on top of it.
    pub fn is_disabled(&self) -> bool {
        !self.auto_complete_parent
    }
}

fn default_true() -> bool {
    true
}

/// Which literal checkbox characters mean which state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatuses {
    #[serde(default = "default_not_started")]
    pub not_started: StatusSet,
    #[serde(default = "default_completed")]
    pub completed: StatusSet,
    #[serde(default = "default_in_progress")]
    pub in_progress: StatusSet,
    #[serde(default = "default_abandoned")]
    pub abandoned: StatusSet,
    #[serde(default = "default_planned")]
    pub planned: StatusSet,
}

impl Default for TaskStatuses {
    fn default() -> Self {
        TaskStatuses {
            not_started: default_not_started(),
            completed: default_completed(),
            in_progress: default_in_progress(),
            abandoned: default_abandoned(),
            planned: default_planned(),
        }
    }
}

impl TaskStatuses {
    pub fn is_completed(&self, status: char) -> bool {
        self.completed.contains(status)
    }

    pub fn is_not_started(&self, status: char) -> bool {
        self.not_started.contains(status)
    }

    /// The character written when completing a task
    pub fn completed_char(&self) -> char {
        self.completed.canonical().unwrap_or(DEFAULT_COMPLETED)
    }

    /// The character written when marking a task in progress
    pub fn in_progress_char(&self) -> char {
        self.in_progress.canonical().unwrap_or(DEFAULT_IN_PROGRESS)
    }
}

fn default_not_started() -> StatusSet {
    StatusSet::from_chars([' '])
}

fn default_completed() -> StatusSet {
    StatusSet::from_chars(['x', 'X'])
}

fn default_in_progress() -> StatusSet {
    StatusSet::from_chars(['>', '/'])
}

fn default_abandoned() -> StatusSet {
    StatusSet::from_chars(['-'])
}

fn default_planned() -> StatusSet {
    StatusSet::from_chars(['?'])
}

/// Error parsing a `|`-delimited status set
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatusSetError {
    #[error("status marker {0:?} must be exactly one character")]
    NotOneChar(String),
}

/// An ordered set of status characters. The first one is canonical: it is
/// the character written when the engine sets that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusSet(Vec<char>);

impl StatusSet {
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = Vec::new();
        for c in chars {
            if !set.contains(&c) {
                set.push(c);
            }
        }
        StatusSet(set)
    }

    /// Parse `"x|X"`. An empty string is the empty set; a lone space is
    /// the space character, not a blank entry.
    pub fn parse(s: &str) -> Result<Self, StatusSetError> {
        if s.is_empty() {
            return Ok(StatusSet(Vec::new()));
        }
        let mut chars = Vec::new();
        for part in s.split('|') {
            let mut it = part.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => chars.push(c),
                _ => return Err(StatusSetError::NotOneChar(part.to_string())),
            }
        }
        Ok(StatusSet::from_chars(chars))
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn canonical(&self) -> Option<char> {
        self.0.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }
}

impl TryFrom<String> for StatusSet {
    type Error = StatusSetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StatusSet::parse(&s)
    }
}

impl From<StatusSet> for String {
    fn from(set: StatusSet) -> String {
        set.0
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Workflow integration switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPolicy {
    #[serde(default)]
    pub enabled: bool,
    /// A completed-looking child only counts as completed when it is at the
    /// last stage of its workflow
    #[serde(default)]
    pub auto_remove_last_stage_marker: bool,
}

impl WorkflowPolicy {
    /// Whether completion of a child must be confirmed by the workflow oracle
    pub fn checks_final_stage(&self) -> bool {
        self.enabled && self.auto_remove_last_stage_marker
    }
}

/// How the host editor indents nested list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentSettings {
    #[serde(default = "default_true")]
    pub use_tabs: bool,
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

impl Default for IndentSettings {
    fn default() -> Self {
        IndentSettings {
            use_tabs: true,
            tab_size: default_tab_size(),
        }
    }
}

impl IndentSettings {
    pub fn spaces(tab_size: usize) -> Self {
        IndentSettings {
            use_tabs: false,
            tab_size,
        }
    }

    pub fn tabs() -> Self {
        IndentSettings::default()
    }

    /// Indent width of one nesting level. One tab is one level; with spaces
    /// a level is `tab_size` spaces.
    pub fn indent_unit(&self) -> usize {
        if self.use_tabs { 1 } else { self.tab_size }
    }
}

fn default_tab_size() -> usize {
    4
}
