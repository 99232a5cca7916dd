//! One validation pass over one document.
//!
//! The runner owns the pass policy: the overlay is cleared before anything
//! else touches it, the schema validator runs before the style linters, the
//! first writer for a line wins, and a collaborator that fails to run is
//! logged and skipped instead of taking the pass down. Annotations from a
//! pass therefore always describe one consistent snapshot of the document.

use std::path::Path;

use crate::config::Config;
use crate::document::Document;
use crate::key_path::ParsedError;
use crate::overlay::{Annotation, EditorSurface, Overlay};
use crate::resolver;
#[cfg(feature = "suggest")]
use crate::suggest::{SuggestionContext, SuggestionProvider};
use crate::validator::schema::{self, ValidationOutcome};
use crate::validator::style::{self, StyleFinding};

/// Everything a caller needs to render the result of one pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub outcome: ValidationOutcome,
    /// Annotations live on the overlay after this pass, in line order
    pub annotations: Vec<Annotation>,
    /// Collaborators that failed to run, as (name, error) pairs
    pub tool_failures: Vec<(String, String)>,
    /// True when model suggestions replaced the raw error text
    pub suggestions_used: bool,
}

/// Drives the external collaborators for one document.
pub struct ValidationRunner<'a> {
    config: &'a Config,
    #[cfg(feature = "suggest")]
    suggester: Option<Box<dyn SuggestionProvider>>,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            #[cfg(feature = "suggest")]
            suggester: None,
        }
    }

    /// Attach a suggestion provider for subsequent async passes.
    #[cfg(feature = "suggest")]
    pub fn with_suggester(mut self, suggester: Box<dyn SuggestionProvider>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Run one blocking pass.
    ///
    /// `text` is the content to resolve against and `document` the path
    /// handed to the external tools; callers validating an unsaved buffer
    /// pass a temp file path. The blocking path never consults the
    /// suggestion provider.
    pub fn run_sync<S: EditorSurface>(
        &self,
        document: &Path,
        schema: Option<&Path>,
        text: &str,
        overlay: &mut Overlay<S>,
    ) -> PassReport {
        #[cfg(debug_assertions)]
        {
            crate::init_logger();
        }

        overlay.clear_all();
        let mut tool_failures = Vec::new();

        let outcome = match schema {
            Some(schema_path) => {
                schema::validate_sync(&self.config.validator, schema_path, document)
            }
            None => ValidationOutcome::ToolError {
                raw: format!("no schema found for {}", document.display()),
            },
        };

        match &outcome {
            ValidationOutcome::SchemaFailure { errors, .. } => {
                apply_schema_errors(errors, None, text, overlay);
            }
            ValidationOutcome::ToolError { raw } => {
                log::warn!("schema validator failed: {}", raw);
                tool_failures.push((self.config.validator.cmd.clone(), raw.clone()));
            }
            ValidationOutcome::Success { .. } => {}
        }

        for linter in self.config.linters.iter().filter(|l| l.enabled) {
            match style::run_style_sync(linter, document) {
                Ok(findings) => apply_style_findings(&linter.name, &findings, overlay),
                Err(e) => {
                    log::warn!("style linter '{}' failed: {}", linter.name, e);
                    tool_failures.push((linter.name.clone(), e.to_string()));
                }
            }
        }

        PassReport {
            outcome,
            annotations: overlay.annotations(),
            tool_failures,
            suggestions_used: false,
        }
    }

    /// Async twin of [`run_sync`]; additionally consults the suggestion
    /// provider, when one is attached, to reword schema errors.
    #[cfg(any(feature = "lsp", feature = "suggest"))]
    pub async fn run<S: EditorSurface>(
        &self,
        document: &Path,
        schema: Option<&Path>,
        text: &str,
        overlay: &mut Overlay<S>,
    ) -> PassReport {
        #[cfg(debug_assertions)]
        {
            crate::init_logger();
        }

        overlay.clear_all();
        let mut tool_failures = Vec::new();
        let mut suggestions_used = false;

        let outcome = match schema {
            Some(schema_path) => {
                schema::validate(&self.config.validator, schema_path, document).await
            }
            None => ValidationOutcome::ToolError {
                raw: format!("no schema found for {}", document.display()),
            },
        };

        match &outcome {
            ValidationOutcome::SchemaFailure { errors, .. } => {
                #[cfg(feature = "suggest")]
                let suggestions = self.fetch_suggestions(errors, schema, text).await;
                #[cfg(not(feature = "suggest"))]
                let suggestions: Option<Vec<String>> = None;

                suggestions_used = suggestions.is_some();
                apply_schema_errors(errors, suggestions, text, overlay);
            }
            ValidationOutcome::ToolError { raw } => {
                log::warn!("schema validator failed: {}", raw);
                tool_failures.push((self.config.validator.cmd.clone(), raw.clone()));
            }
            ValidationOutcome::Success { .. } => {}
        }

        for linter in self.config.linters.iter().filter(|l| l.enabled) {
            match style::run_style(linter, document).await {
                Ok(findings) => apply_style_findings(&linter.name, &findings, overlay),
                Err(e) => {
                    log::warn!("style linter '{}' failed: {}", linter.name, e);
                    tool_failures.push((linter.name.clone(), e.to_string()));
                }
            }
        }

        PassReport {
            outcome,
            annotations: overlay.annotations(),
            tool_failures,
            suggestions_used,
        }
    }

    /// Ask the attached provider to reword the errors.
    ///
    /// A batch of the wrong size is discarded whole rather than zipped out
    /// of order; the raw error text is the fallback either way.
    #[cfg(feature = "suggest")]
    async fn fetch_suggestions(
        &self,
        errors: &[String],
        schema: Option<&Path>,
        text: &str,
    ) -> Option<Vec<String>> {
        let suggester = self.suggester.as_ref()?;
        let context = SuggestionContext {
            schema: schema.and_then(|p| std::fs::read_to_string(p).ok()),
            document: text.to_string(),
        };
        match suggester.suggest(errors, &context).await {
            Ok(suggestions) if suggestions.len() == errors.len() => Some(suggestions),
            Ok(suggestions) => {
                log::warn!(
                    "discarding suggestion batch: expected {}, got {}",
                    errors.len(),
                    suggestions.len()
                );
                None
            }
            Err(e) => {
                log::warn!("suggestions unavailable: {}", e);
                None
            }
        }
    }
}

/// Resolve each raw error against a fresh snapshot and annotate its line.
///
/// `suggestions`, when present, is the same length as `errors`; zipping by
/// position keeps each suggestion on the line of the error it rewords.
fn apply_schema_errors<S: EditorSurface>(
    errors: &[String],
    suggestions: Option<Vec<String>>,
    text: &str,
    overlay: &mut Overlay<S>,
) {
    let doc = Document::new(text);
    let texts = suggestions.unwrap_or_else(|| errors.to_vec());

    for (raw, note) in errors.iter().zip(texts.iter()) {
        let parsed = ParsedError::parse(raw);
        let line = resolver::resolve_error(&parsed, &doc);
        log::debug!("resolved {:?} to line {}", raw, line);
        overlay.apply(line, note);
    }
}

fn apply_style_findings<S: EditorSurface>(
    name: &str,
    findings: &[StyleFinding],
    overlay: &mut Overlay<S>,
) {
    for finding in findings {
        let note = format!("[{}]: {}", name, finding.message);
        overlay.apply(finding.line, &note);
    }
}
