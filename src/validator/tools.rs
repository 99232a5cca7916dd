//! Child-process plumbing shared by the schema validator and style linters.
//!
//! Every collaborator is an external command that reads a file path and
//! reports findings as text. Invocation is isolated here so the rest of the
//! validator only sees captured output, never process handles.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

/// Errors that can occur when invoking an external tool.
#[derive(Debug)]
pub enum ToolError {
    /// Command not found or failed to spawn
    SpawnFailed(String),
    /// Exited non-zero without writing anything to classify (note: tools
    /// routinely exit 1 when they find issues, which is not an error)
    NonZeroExit { code: i32, stderr: String },
    /// Tool ran past its deadline
    Timeout,
    /// I/O error during communication with the tool
    Io(std::io::Error),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpawnFailed(cmd) => write!(f, "failed to spawn tool: {}", cmd),
            Self::NonZeroExit { code, stderr } => {
                write!(f, "tool exited with code {}: {}", code, stderr.trim())
            }
            Self::Timeout => write!(f, "tool timed out"),
            Self::Io(e) => write!(f, "tool I/O error: {}", e),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Captured result of one tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run a tool to completion, blocking.
///
/// The timeout can only be checked after the fact here; the async variant
/// enforces it properly. CLI runs are one-shot, so a stuck tool stalls the
/// invocation either way.
pub fn run_tool_sync(
    cmd: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput, ToolError> {
    let start = Instant::now();

    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ToolError::SpawnFailed(format!("{}: {}", cmd, e)))?;

    if start.elapsed() > timeout {
        return Err(ToolError::Timeout);
    }

    capture(output)
}

/// Run a tool to completion with a hard deadline.
///
/// The child is killed when its handle drops, so a tool that outlives the
/// deadline does not linger.
#[cfg(any(feature = "lsp", feature = "suggest"))]
pub async fn run_tool(
    cmd: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput, ToolError> {
    let child = tokio::process::Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ToolError::SpawnFailed(format!("{}: {}", cmd, e)))?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| ToolError::Timeout)?
        .map_err(ToolError::Io)?;

    capture(output)
}

fn capture(output: std::process::Output) -> Result<ToolOutput, ToolError> {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    // A non-zero exit with stdout present means "findings"; the caller
    // classifies those. Only a silent failure is an invocation error.
    if !output.status.success() && stdout.is_empty() {
        return Err(ToolError::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(ToolOutput {
        code: output.status.code(),
        stdout,
        stderr,
    })
}

/// Write live buffer text to a temp file so file-based tools can see it.
///
/// The handle owns the file and removes it on drop; callers keep it alive
/// for the duration of the run. A `.yml` suffix is attached because some
/// tools sniff the extension before they read anything.
pub fn write_temp_document(text: &str) -> Result<NamedTempFile, ToolError> {
    let mut file = tempfile::Builder::new()
        .prefix("vargloss-")
        .suffix(".yml")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file)
}
