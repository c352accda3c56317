use std::ops::Range;
use std::sync::Arc;

/// One line of a document. `text` never includes the trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character of the line
    pub start: usize,
    pub text: &'a str,
}

/// Immutable, line-indexed text for one document revision.
///
/// Cloning is cheap: the text is shared. Every lookup is bounds-checked and
/// returns `None` outside the document, so analysis code never panics on a
/// mis-measured offset.
#[derive(Debug, Clone)]
pub struct Document {
    text: Arc<str>,
    /// Byte offset where each line starts; always has at least one entry
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Document { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line by 1-based number
    pub fn line(&self, number: usize) -> Option<Line<'_>> {
        if number == 0 {
            return None;
        }
        let start = *self.line_starts.get(number - 1)?;
        let end = self
            .line_starts
            .get(number)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(Line {
            number,
            start,
            text: &self.text[start..end],
        })
    }

    /// The line containing byte `offset`. An offset equal to the document
    /// length resolves to the last line.
    pub fn line_at(&self, offset: usize) -> Option<Line<'_>> {
        if offset > self.text.len() {
            return None;
        }
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        self.line(idx + 1)
    }

    /// Text in `[from, to)`, or `None` if the range is out of bounds or
    /// splits a character
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    /// Iterate over all lines in order
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        (1..=self.line_count()).filter_map(|n| self.line(n))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.text, &other.text) || self.text == other.text
    }
}

impl Eq for Document {}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Document::new(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Document::new(text)
    }
}
