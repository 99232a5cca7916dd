//! Line-oriented snapshot of a document under validation.
//!
//! Resolution works on raw lines, never on a parse tree, so a document that
//! is mid-edit and structurally broken is still addressable. A snapshot is
//! taken at the start of every validation pass and discarded afterwards;
//! nothing here survives an edit.

/// An immutable, line-indexed view of document text.
///
/// Lines are addressed 1-based to match what editors and external tools
/// report. Line endings are not stored; both `\n` and `\r\n` input produce
/// the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Build a snapshot directly from lines, mostly useful in tests
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the 1-based line `n`, without its line ending
    pub fn line(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.lines.get(n - 1).map(String::as_str)
    }

    /// Iterate over `(line_number, text)` pairs, 1-based
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.as_str()))
    }
}
