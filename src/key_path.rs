//! Parsing of raw validator error lines.
//!
//! Schema validators report failures as plain `<key-path>: <message>` text,
//! one error per line. This module splits such a line into a structured
//! [`KeyPath`] plus message and classifies the message, without assuming
//! anything about the validator beyond that shape.

use std::fmt;

/// One atomic component of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A field name, matched against document lines by substring
    Key(String),
    /// A zero-based position within a list
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(n) => write!(f, "{}", n),
        }
    }
}

/// A dotted, possibly indexed address into a structured document, e.g.
/// `devices.1.interfaces.0.name`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Split a dotted path into segments.
    ///
    /// A segment made up entirely of ASCII digits becomes an index; anything
    /// else, including mixed forms like `2a`, stays a key.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(parse_segment).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path with its final segment dropped.
    ///
    /// This is the resolution target for missing-field errors: the field
    /// itself is absent from the document, so its parent container is the
    /// closest line that can carry the annotation.
    pub fn parent(&self) -> KeyPath {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

fn parse_segment(raw: &str) -> Segment {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        // Absurdly long digit runs overflow usize and fall back to a key
        if let Ok(n) = raw.parse::<usize>() {
            return Segment::Index(n);
        }
    }
    Segment::Key(raw.to_string())
}

/// One validator error line, split into its addressing and message parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedError {
    pub path: KeyPath,
    pub message: String,
    /// True when the message indicates a missing required field
    pub missing: bool,
}

impl ParsedError {
    /// Split a raw error line on its first colon.
    ///
    /// Everything before the colon is the key path, everything after it the
    /// message; both are trimmed. A line without a colon degrades to a bare
    /// message with an empty path, which later resolves to line 1.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((path, message)) => {
                let message = message.trim();
                Self {
                    path: KeyPath::parse(path.trim()),
                    message: message.to_string(),
                    missing: is_missing_message(message),
                }
            }
            None => Self {
                path: KeyPath::default(),
                message: raw.trim().to_string(),
                missing: false,
            },
        }
    }

    /// The path the resolver should walk.
    ///
    /// A missing field has no line of its own, so its final segment is
    /// dropped and the parent container is targeted instead.
    pub fn resolution_path(&self) -> KeyPath {
        if self.missing {
            self.path.parent()
        } else {
            self.path.clone()
        }
    }

    /// Whether this error addresses the document as a whole.
    ///
    /// Paths with at most one segment carry no position worth scanning for;
    /// they are anchored to line 1 without a walk.
    pub fn is_document_level(&self) -> bool {
        self.path.len() <= 1
    }
}

/// Heuristic classification of free-text validator messages.
///
/// The upstream vocabulary is not tagged, so a missing required field is
/// recognized by substring. Kept in one place so a structured error code can
/// replace it if the validator ever grows one.
fn is_missing_message(message: &str) -> bool {
    message.to_lowercase().contains("missing")
}
