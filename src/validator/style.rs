//! Style linter collaborators.
//!
//! Style linters differ from the schema validator in one structural way:
//! their reports already carry absolute line numbers, so no key-path
//! resolution happens here. Two report shapes cover the tools in use;
//! which one a linter speaks is declared in its config entry.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::LinterConfig;
use crate::validator::tools::{self, ToolError};

/// How a style linter formats its diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleFormat {
    /// `<line>:<col>: [<level>] <message>`, one finding per line, possibly
    /// prefixed with the document path (yamllint's parsable output)
    LineCol,
    /// A message line followed by a `<path>:<line>` locator line
    /// (ansible-lint's default output)
    Locator,
}

impl Default for StyleFormat {
    fn default() -> Self {
        Self::LineCol
    }
}

/// One style finding, carrying an absolute 1-based document line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleFinding {
    pub line: usize,
    pub message: String,
}

/// Run a style linter over a document, blocking.
///
/// The tool is invoked as `<cmd> <args...> <document>`. Exit code 1 with
/// findings on stdout is the normal rejection path, not an error.
pub fn run_style_sync(
    config: &LinterConfig,
    document: &Path,
) -> Result<Vec<StyleFinding>, ToolError> {
    let args = invocation_args(config, document);
    let output = tools::run_tool_sync(&config.cmd, &args, config.timeout())?;
    Ok(parse_output(config.format, &output.stdout, document))
}

/// Async twin of [`run_style_sync`] for the language server.
#[cfg(any(feature = "lsp", feature = "suggest"))]
pub async fn run_style(
    config: &LinterConfig,
    document: &Path,
) -> Result<Vec<StyleFinding>, ToolError> {
    let args = invocation_args(config, document);
    let output = tools::run_tool(&config.cmd, &args, config.timeout()).await?;
    Ok(parse_output(config.format, &output.stdout, document))
}

fn invocation_args(config: &LinterConfig, document: &Path) -> Vec<String> {
    let mut args = config.args.clone();
    args.push(document.display().to_string());
    args
}

/// Parse linter output into findings according to its declared format.
///
/// Lines that fit neither shape are skipped; a linter that prints a banner
/// or a summary should not take the whole report down with it.
pub fn parse_output(format: StyleFormat, output: &str, document: &Path) -> Vec<StyleFinding> {
    match format {
        StyleFormat::LineCol => parse_line_col(output, document),
        StyleFormat::Locator => parse_locator(output),
    }
}

static LINE_COL_RE: OnceLock<Regex> = OnceLock::new();
static LOCATOR_RE: OnceLock<Regex> = OnceLock::new();

fn parse_line_col(output: &str, document: &Path) -> Vec<StyleFinding> {
    let re = LINE_COL_RE
        .get_or_init(|| Regex::new(r"^(\d+):(\d+):\s*(?:\[(\w+)\]\s*)?(.*)$").unwrap());
    let prefix = format!("{}:", document.display());

    let mut findings = Vec::new();
    for raw_line in output.lines() {
        let line = raw_line.trim();
        let line = line
            .strip_prefix(&prefix)
            .map(str::trim_start)
            .unwrap_or(line);

        let Some(caps) = re.captures(line) else {
            if !line.is_empty() {
                log::debug!("skipping unrecognized style line: {}", line);
            }
            continue;
        };
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        let message = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");
        if number == 0 || message.is_empty() {
            continue;
        }
        findings.push(StyleFinding {
            line: number,
            message: message.to_string(),
        });
    }
    findings
}

fn parse_locator(output: &str) -> Vec<StyleFinding> {
    let re = LOCATOR_RE.get_or_init(|| Regex::new(r"^(\S+):(\d+)$").unwrap());

    let mut findings = Vec::new();
    let mut pending: Option<&str> = None;
    for raw_line in output.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            pending = None;
            continue;
        }

        let locator = re
            .captures(line)
            .and_then(|caps| caps[2].parse::<usize>().ok())
            .filter(|&n| n >= 1);
        match locator {
            Some(number) => match pending.take() {
                Some(message) => findings.push(StyleFinding {
                    line: number,
                    message: message.to_string(),
                }),
                None => log::debug!("style locator without a preceding message: {}", line),
            },
            None => pending = Some(line),
        }
    }
    findings
}
