//! Schema validation through an external validator.
//!
//! The validator is a black box invoked as `<cmd> <args...> <schema>
//! <document>`. Its exit code separates acceptance from rejection; its
//! stdout carries the failure report that the rest of the pipeline feeds
//! on. Nothing here understands the document format itself.

use std::path::Path;

use crate::config::ToolConfig;
use crate::validator::tools::{self, ToolError, ToolOutput};

/// Outcome of one schema validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The validator accepted the document
    Success { message: String },
    /// The validator rejected the document with addressable errors
    SchemaFailure { errors: Vec<String>, raw: String },
    /// The validator could not produce a usable report
    ToolError { raw: String },
}

/// Run the configured validator against a schema and document, blocking.
pub fn validate_sync(config: &ToolConfig, schema: &Path, document: &Path) -> ValidationOutcome {
    let args = invocation_args(config, schema, document);
    classify(tools::run_tool_sync(&config.cmd, &args, config.timeout()))
}

/// Async twin of [`validate_sync`] for the language server.
#[cfg(any(feature = "lsp", feature = "suggest"))]
pub async fn validate(config: &ToolConfig, schema: &Path, document: &Path) -> ValidationOutcome {
    let args = invocation_args(config, schema, document);
    classify(tools::run_tool(&config.cmd, &args, config.timeout()).await)
}

fn invocation_args(config: &ToolConfig, schema: &Path, document: &Path) -> Vec<String> {
    let mut args = config.args.clone();
    args.push(schema.display().to_string());
    args.push(document.display().to_string());
    args
}

fn classify(result: Result<ToolOutput, ToolError>) -> ValidationOutcome {
    match result {
        Ok(output) if output.success() => {
            let message = output.stdout.trim();
            ValidationOutcome::Success {
                message: if message.is_empty() {
                    "schema validation passed".to_string()
                } else {
                    message.to_string()
                },
            }
        }
        Ok(output) => {
            let raw = output.stdout.trim().to_string();
            let errors = parse_failure_report(&raw);
            if errors.is_empty() {
                // Rejected the document but said nothing we can anchor
                ValidationOutcome::ToolError { raw }
            } else {
                ValidationOutcome::SchemaFailure { errors, raw }
            }
        }
        Err(e) => ValidationOutcome::ToolError { raw: e.to_string() },
    }
}

/// Extract raw error lines from a failure report.
///
/// The first line is a header naming the document and schema. Every
/// following non-empty line containing a colon is one `<key-path>:
/// <message>` entry; summary lines carry no colon and are skipped.
pub fn parse_failure_report(report: &str) -> Vec<String> {
    report
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(':'))
        .map(str::to_string)
        .collect()
}
