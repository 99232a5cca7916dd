//! Advisory annotations anchored to document lines.
//!
//! Annotations are rendered as end-of-line markers owned by the editor;
//! they never touch the document text or its undo history. Each open
//! document gets exactly one [`Overlay`], and every marker ever created
//! goes through it, so clearing can always dispose the full set.

use std::collections::BTreeMap;

/// Handle to one live end-of-line marker created through an
/// [`EditorSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// The primitives the overlay needs from a hosting editor: read access to
/// lines plus creation and disposal of end-of-line markers.
pub trait EditorSurface {
    fn line_count(&self) -> usize;

    /// Text of the 1-based line `n`, if it exists
    fn line_text(&self, n: usize) -> Option<String>;

    /// Create a marker anchored after the last character of line `line`,
    /// showing `text`. The anchor sits past the line's end so it can never
    /// collide with a cursor or selection inside the line.
    fn create_marker(&mut self, line: usize, text: &str) -> MarkerId;

    fn dispose_marker(&mut self, id: MarkerId);
}

/// One advisory annotation as held by the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub line: usize,
    pub text: String,
}

/// Per-document registry of advisory markers.
///
/// Within a single validation pass the first writer for a line wins; later
/// writes to the same line are dropped. The registry keys by line, so
/// disposal and lookup stay independent of how the surface implements
/// markers.
#[derive(Debug)]
pub struct Overlay<S> {
    surface: S,
    markers: BTreeMap<usize, (MarkerId, String)>,
}

impl<S: EditorSurface> Overlay<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers: BTreeMap::new(),
        }
    }

    /// Anchor `text` at the end of `line`.
    ///
    /// Returns false when the line already holds an annotation; the earlier
    /// writer keeps the line and this call does nothing.
    pub fn apply(&mut self, line: usize, text: &str) -> bool {
        if self.markers.contains_key(&line) {
            log::debug!("line {} already annotated, dropping {:?}", line, text);
            return false;
        }
        let id = self.surface.create_marker(line, text);
        self.markers.insert(line, (id, text.to_string()));
        true
    }

    /// Dispose every live marker and empty the registry.
    ///
    /// Idempotent. Runs at the start of every validation pass so stale
    /// results never show alongside fresh ones.
    pub fn clear_all(&mut self) {
        for (_, (id, _)) in std::mem::take(&mut self.markers) {
            self.surface.dispose_marker(id);
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Annotation text currently anchored to `line`, if any
    pub fn annotation(&self, line: usize) -> Option<&str> {
        self.markers.get(&line).map(|(_, text)| text.as_str())
    }

    /// Current annotations in line order
    pub fn annotations(&self) -> Vec<Annotation> {
        self.markers
            .iter()
            .map(|(&line, (_, text))| Annotation {
                line,
                text: text.clone(),
            })
            .collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// A recorded marker inside a [`BufferSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: MarkerId,
    pub line: usize,
    /// Character column of the anchor, one past the line's last character
    pub column: usize,
    pub text: String,
}

/// In-memory surface over a document snapshot.
///
/// Markers are recorded rather than rendered. This backs the CLI, which
/// prints annotations instead of drawing them, and the test harnesses.
#[derive(Debug, Default)]
pub struct BufferSurface {
    lines: Vec<String>,
    live: Vec<Marker>,
    next_id: u64,
}

impl BufferSurface {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            live: Vec::new(),
            next_id: 0,
        }
    }

    pub fn live_markers(&self) -> &[Marker] {
        &self.live
    }
}

impl EditorSurface for BufferSurface {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, n: usize) -> Option<String> {
        if n == 0 {
            return None;
        }
        self.lines.get(n - 1).cloned()
    }

    fn create_marker(&mut self, line: usize, text: &str) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        let column = self
            .line_text(line)
            .map(|text| text.chars().count())
            .unwrap_or(0);
        self.live.push(Marker {
            id,
            line,
            column,
            text: text.to_string(),
        });
        id
    }

    fn dispose_marker(&mut self, id: MarkerId) {
        self.live.retain(|marker| marker.id != id);
    }
}
