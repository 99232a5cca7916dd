pub mod config;
pub mod document;
pub mod key_path;
#[cfg(feature = "lsp")]
pub mod lsp;
pub mod overlay;
pub mod resolver;
#[cfg(feature = "suggest")]
pub mod suggest;
pub mod validator;

pub use config::Config;
pub use document::Document;
pub use key_path::{KeyPath, ParsedError, Segment};
pub use overlay::{Annotation, BufferSurface, EditorSurface, Overlay};
pub use validator::{PassReport, ValidationOutcome, ValidationRunner};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Resolves one raw validator error line against document text.
///
/// This runs the full parse-classify-resolve pipeline for a single error
/// and returns the 1-based line its annotation would anchor to.
///
/// # Examples
///
/// ```rust
/// use vargloss::resolve_error_line;
///
/// let text = "devices:\n  - name: sw1\n  - name: sw2\n  - type: x\n";
/// let line = resolve_error_line("devices.1.type: Required field missing", text);
/// assert_eq!(line, 3);
/// ```
///
/// # Arguments
///
/// * `raw` - One `<key-path>: <message>` line from a validator report
/// * `text` - The document content to resolve against
pub fn resolve_error_line(raw: &str, text: &str) -> usize {
    let parsed = ParsedError::parse(raw);
    resolver::resolve_error(&parsed, &Document::new(text))
}
