//! CLI integration tests for vargloss.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (check, resolve, lsp)
//! - Config discovery and stubbed external tools
//! - Exit codes
//! - Error handling

mod check;
mod common;

#[cfg(feature = "lsp")]
mod lsp;
