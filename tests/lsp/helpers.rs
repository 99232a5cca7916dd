//! Test helpers for LSP integration testing
//!
//! This module provides utilities to test LSP functionality in-memory
//! without spawning the binary or dealing with stdio protocol.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tower_lsp_server::ls_types::*;
use tower_lsp_server::{LanguageServer, LspService};

use vargloss::lsp::VarglossLsp;

/// Test harness for LSP integration tests.
///
/// Wraps a `VarglossLsp` instance created via `LspService::new`.
/// Provides helper methods for common LSP operations.
pub struct TestLspServer {
    lsp: Arc<VarglossLsp>,
}

impl TestLspServer {
    /// Create a new test LSP server.
    ///
    /// This creates a real `VarglossLsp` instance with a real `Client`,
    /// using the same `LspService::new` pattern as production code.
    pub fn new() -> Self {
        // Use Arc to share ownership between the closure and our return value
        let lsp_arc: Arc<std::sync::Mutex<Option<Arc<VarglossLsp>>>> =
            Arc::new(std::sync::Mutex::new(None));
        let lsp_arc_clone = Arc::clone(&lsp_arc);

        let (_service, _socket) = LspService::new(move |client| {
            let lsp = Arc::new(VarglossLsp::new(client));
            *lsp_arc_clone.lock().unwrap() = Some(Arc::clone(&lsp));

            // Return the Arc wrapped in a struct that implements LanguageServer
            LspWrapper { inner: lsp }
        });

        // Extract the VarglossLsp Arc
        let lsp = lsp_arc
            .lock()
            .unwrap()
            .take()
            .expect("VarglossLsp should have been initialized");

        Self { lsp }
    }

    /// Open a document with the given URI and content.
    ///
    /// Simulates the `textDocument/didOpen` notification.
    pub async fn open_document(&self, uri: &str, content: &str) {
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.parse().unwrap(),
                language_id: "yaml".to_string(),
                version: 0,
                text: content.to_string(),
            },
        };

        self.lsp.did_open(params).await;
    }

    /// Close a document.
    ///
    /// Simulates the `textDocument/didClose` notification.
    pub async fn close_document(&self, uri: &str) {
        let params = DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier {
                uri: uri.parse().unwrap(),
            },
        };

        self.lsp.did_close(params).await;
    }

    /// Edit a document with incremental changes.
    ///
    /// Simulates the `textDocument/didChange` notification with INCREMENTAL sync.
    pub async fn edit_document(&self, uri: &str, changes: Vec<TextDocumentContentChangeEvent>) {
        let params = DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.parse().unwrap(),
                version: 1,
            },
            content_changes: changes,
        };

        self.lsp.did_change(params).await;
    }

    /// Get the current content of a document from the server's state.
    pub async fn document_text(&self, uri: &str) -> Option<String> {
        self.lsp.document_text(uri).await
    }

    /// Get the change generation of a document from the server's state.
    pub async fn document_generation(&self, uri: &str) -> Option<u64> {
        self.lsp.document_generation(uri).await
    }
}

/// Wrapper that delegates all LanguageServer methods to the inner Arc<VarglossLsp>.
///
/// This is needed because LspService requires ownership of the LanguageServer impl,
/// but we also need to retain a reference for testing.
struct LspWrapper {
    inner: Arc<VarglossLsp>,
}

// Delegate all LanguageServer methods to the inner Arc<VarglossLsp>
impl LanguageServer for LspWrapper {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp_server::jsonrpc::Result<InitializeResult> {
        self.inner.initialize(params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        self.inner.initialized(params).await
    }

    async fn shutdown(&self) -> tower_lsp_server::jsonrpc::Result<()> {
        self.inner.shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.inner.did_open(params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.inner.did_change(params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.inner.did_close(params).await
    }
}

/// Write a config that stubs the schema validator and disables the linters,
/// so tests never spawn a real external tool.
pub fn seed_quiet_config(dir: &Path) {
    fs::write(
        dir.join(".vargloss.toml"),
        "linters = []\n\n[validator]\ncmd = \"sh\"\nargs = [\"-c\", \"echo ok\"]\n",
    )
    .unwrap();
}

/// URI for a file inside `dir`.
pub fn file_uri(dir: &Path, name: &str) -> String {
    format!("file://{}", dir.join(name).display())
}

/// Helper to create a simple text change event (full document replacement).
pub fn full_document_change(text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: text.to_string(),
    }
}

/// Helper to create an incremental text change event.
pub fn incremental_change(
    start_line: u32,
    start_char: u32,
    end_line: u32,
    end_char: u32,
    text: &str,
) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position {
                line: start_line,
                character: start_char,
            },
            end: Position {
                line: end_line,
                character: end_char,
            },
        }),
        range_length: None,
        text: text.to_string(),
    }
}
