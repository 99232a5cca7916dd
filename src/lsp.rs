use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;
use tower_lsp_server::{Client, LanguageServer, LspService, Server};

use crate::config::{self, Config};
use crate::overlay::{Annotation, BufferSurface, Overlay};
#[cfg(feature = "suggest")]
use crate::suggest::HttpSuggestionProvider;
use crate::validator::ValidationRunner;
use crate::validator::tools;

/// Helper to convert LSP UTF-16 position to byte offset in UTF-8 string
fn position_to_offset(text: &str, position: Position) -> Option<usize> {
    let mut offset = 0;
    let mut current_line = 0;

    for line in text.lines() {
        if current_line == position.line {
            // LSP uses UTF-16 code units, Rust uses UTF-8 bytes
            let mut utf16_offset = 0;
            for (byte_idx, ch) in line.char_indices() {
                if utf16_offset >= position.character as usize {
                    return Some(offset + byte_idx);
                }
                utf16_offset += ch.len_utf16();
            }
            // Position is at or past end of line
            return Some(offset + line.len());
        }
        // +1 for newline character
        offset += line.len() + 1;
        current_line += 1;
    }

    // Position is beyond document end
    if current_line == position.line {
        // Empty last line or position at very end
        return Some(offset);
    }

    None
}

/// Apply a single content change to text
fn apply_content_change(text: &str, change: &TextDocumentContentChangeEvent) -> String {
    match &change.range {
        Some(range) => {
            // Incremental edit with range
            let start_offset = position_to_offset(text, range.start).unwrap_or(0);
            let end_offset = position_to_offset(text, range.end).unwrap_or(text.len());

            let mut result =
                String::with_capacity(text.len() - (end_offset - start_offset) + change.text.len());
            result.push_str(&text[..start_offset]);
            result.push_str(&change.text);
            result.push_str(&text[end_offset..]);
            result
        }
        None => {
            // Full document update (fallback)
            change.text.clone()
        }
    }
}

/// Convert one overlay annotation to an LSP diagnostic.
///
/// The diagnostic is anchored as an empty range just past the last character
/// of its line, matching the end-of-line markers the overlay describes.
fn annotation_to_diagnostic(annotation: &Annotation, text: &str) -> Diagnostic {
    // LSP lines are 0-based; annotation lines are 1-based
    let line = annotation.line.saturating_sub(1);
    let character = text
        .lines()
        .nth(line)
        .map(|l| l.chars().map(|c| c.len_utf16()).sum::<usize>())
        .unwrap_or(0);

    let position = Position {
        line: line as u32,
        character: character as u32,
    };

    Diagnostic {
        range: Range {
            start: position,
            end: position,
        },
        severity: Some(DiagnosticSeverity::WARNING),
        source: Some("vargloss".to_string()),
        message: annotation.text.clone(),
        ..Default::default()
    }
}

/// One open document as the server tracks it.
///
/// `generation` bumps on every change; a validation pass snapshots it and
/// publishes only if the document has not moved on since, so a slow pass
/// over stale text never overwrites fresher results.
struct DocumentState {
    text: String,
    generation: u64,
}

pub struct VarglossLsp {
    client: Client,
    // Use String keys since Uri doesn't implement Send
    documents: Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
}

impl VarglossLsp {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            workspace_root: Arc::new(Mutex::new(None)),
        }
    }

    /// Current text of a tracked document, mainly for state inspection in
    /// tests.
    pub async fn document_text(&self, uri: &str) -> Option<String> {
        self.documents.lock().await.get(uri).map(|s| s.text.clone())
    }

    /// Change generation of a tracked document; bumps on every change.
    pub async fn document_generation(&self, uri: &str) -> Option<u64> {
        self.documents.lock().await.get(uri).map(|s| s.generation)
    }

    async fn load_config(&self, document: Option<&Path>) -> (Config, Option<PathBuf>) {
        let start_dir = match document.and_then(Path::parent) {
            Some(dir) => dir.to_path_buf(),
            None => match self.workspace_root.lock().await.clone() {
                Some(root) => root,
                None => PathBuf::from("."),
            },
        };

        match config::load(None, &start_dir) {
            Ok((config, path)) => {
                if let Some(p) = &path {
                    self.client
                        .log_message(
                            MessageType::INFO,
                            format!("Loaded config from {}", p.display()),
                        )
                        .await;
                }
                (config, path)
            }
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Failed to load config: {}", e),
                    )
                    .await;
                (Config::default(), None)
            }
        }
    }

    /// Run one validation pass over `text` and publish the results.
    ///
    /// Publishing replaces the document's previous diagnostics wholesale,
    /// which is the editor-side equivalent of clearing the overlay before a
    /// pass. A pass whose `generation` is no longer current publishes
    /// nothing.
    async fn validate_and_publish(&self, uri: Uri, text: String, generation: u64) {
        let uri_string = uri.to_string();
        let real_path = uri.to_file_path().map(|p| p.into_owned());

        let (config, config_path) = self.load_config(real_path.as_deref()).await;

        // The buffer may be unsaved; external tools read a temp copy
        let temp = match tools::write_temp_document(&text) {
            Ok(t) => t,
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("Cannot stage buffer for validation: {}", e),
                    )
                    .await;
                return;
            }
        };

        // Schema discovery goes by the real file location, not the temp copy
        let schema = config::find_schema(
            None,
            &config,
            config_path.as_deref(),
            real_path.as_deref().unwrap_or_else(|| temp.path()),
        );

        let runner = ValidationRunner::new(&config);
        #[cfg(feature = "suggest")]
        let runner = if config.suggestions.enabled {
            match HttpSuggestionProvider::new(config.suggestions.clone()) {
                Ok(provider) => runner.with_suggester(Box::new(provider)),
                Err(e) => {
                    self.client
                        .log_message(
                            MessageType::WARNING,
                            format!("Suggestions unavailable: {}", e),
                        )
                        .await;
                    runner
                }
            }
        } else {
            runner
        };

        let mut overlay = Overlay::new(BufferSurface::new(&text));
        let report = runner
            .run(temp.path(), schema.as_deref(), &text, &mut overlay)
            .await;

        for (name, err) in &report.tool_failures {
            self.client
                .log_message(MessageType::WARNING, format!("{}: {}", name, err))
                .await;
        }

        // Discard the pass if the document changed while the tools ran.
        // The lock stays held through the publish, so a newer pass cannot
        // land between this check and the publish below.
        let documents = self.documents.lock().await;
        match documents.get(&uri_string) {
            Some(state) if state.generation == generation => {}
            _ => {
                log::debug!("Discarding stale validation pass for {}", uri_string);
                return;
            }
        }

        let diagnostics: Vec<Diagnostic> = report
            .annotations
            .iter()
            .map(|a| annotation_to_diagnostic(a, &text))
            .collect();

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

impl LanguageServer for VarglossLsp {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Store workspace root for config discovery
        // Try workspace_folders first, fall back to deprecated root_uri
        if let Some(folders) = params.workspace_folders
            && let Some(folder) = folders.first()
            && let Some(path) = folder.uri.to_file_path()
        {
            *self.workspace_root.lock().await = Some(path.into_owned());
        } else {
            #[allow(deprecated)]
            if let Some(root_uri) = params.root_uri
                && let Some(path) = root_uri.to_file_path()
            {
                *self.workspace_root.lock().await = Some(path.into_owned());
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "vargloss-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "vargloss LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        let text = params.text_document.text;

        self.documents.lock().await.insert(
            uri.clone(),
            DocumentState {
                text: text.clone(),
                generation: 0,
            },
        );

        self.client
            .log_message(MessageType::INFO, format!("Opened document: {}", uri))
            .await;

        self.validate_and_publish(params.text_document.uri, text, 0)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        // Apply incremental changes sequentially
        let snapshot = {
            let mut documents = self.documents.lock().await;
            if let Some(state) = documents.get_mut(&uri) {
                for change in params.content_changes {
                    state.text = apply_content_change(&state.text, &change);
                }
                state.generation += 1;
                Some((state.text.clone(), state.generation))
            } else {
                None
            }
        };

        if let Some((text, generation)) = snapshot {
            self.validate_and_publish(params.text_document.uri, text, generation)
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        self.documents.lock().await.remove(&uri);

        // Clear diagnostics
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }
}

pub async fn run() -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(VarglossLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
