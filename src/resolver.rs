//! Best-effort resolution of key paths to document lines.
//!
//! The document under validation is frequently mid-edit and structurally
//! invalid, so resolution never builds a tree. A forward-only cursor walks
//! the raw lines: key segments match by substring, index segments count
//! list-item markers sharing one indentation prefix. Wrong guesses cost an
//! annotation on a nearby line, never a crash, and the cursor never moves
//! backward, so an unmatched segment leaves resolution at the last line
//! that did match.

use crate::document::Document;
use crate::key_path::{KeyPath, ParsedError, Segment};

/// Resolve one parsed validator error to the 1-based line it should be
/// annotated on.
///
/// Document-level errors (paths with at most one segment) pin to line 1
/// without a scan. Missing-field errors walk the parent of their path,
/// since the named field has no line of its own.
pub fn resolve_error(error: &ParsedError, doc: &Document) -> usize {
    if error.is_document_level() {
        return 1;
    }
    resolve_path(&error.resolution_path(), doc)
}

/// Walk a key path through the document and return the cursor's final line.
///
/// The cursor starts at line 1. Each segment scans forward from the cursor
/// (inclusive); a segment with no match leaves the cursor where it is and
/// the walk continues with the next segment.
pub fn resolve_path(path: &KeyPath, doc: &Document) -> usize {
    let mut cursor = 1;

    for segment in path.segments() {
        let found = match segment {
            Segment::Key(key) => find_key(doc, cursor, key),
            Segment::Index(n) => find_list_item(doc, cursor, *n),
        };
        if let Some(line) = found {
            cursor = line;
        }
    }

    cursor
}

/// First line at or after `cursor` whose trimmed text contains `key`
fn find_key(doc: &Document, cursor: usize, key: &str) -> Option<usize> {
    (cursor..=doc.line_count()).find(|&n| {
        doc.line(n)
            .is_some_and(|line| line.trim().contains(key))
    })
}

/// Line of the `index`-th list item at or after `cursor`.
///
/// The first marker line at or after the cursor fixes the indentation
/// prefix; only marker lines with exactly that prefix are counted, starting
/// at zero. Siblings of a nested list are skipped because their prefix
/// differs, but a `---` document separator does start with `-` and will be
/// counted like any other marker.
fn find_list_item(doc: &Document, cursor: usize, index: usize) -> Option<usize> {
    let (first, prefix) = find_first_marker(doc, cursor)?;

    let mut count = 0;
    for n in first..=doc.line_count() {
        let line = doc.line(n)?;
        if is_marker(line) && leading_whitespace(line) == prefix {
            if count == index {
                return Some(n);
            }
            count += 1;
        }
    }

    None
}

fn find_first_marker(doc: &Document, cursor: usize) -> Option<(usize, &str)> {
    for n in cursor..=doc.line_count() {
        let line = doc.line(n)?;
        if is_marker(line) {
            return Some((n, leading_whitespace(line)));
        }
    }
    None
}

fn is_marker(line: &str) -> bool {
    line.trim_start().starts_with('-')
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
