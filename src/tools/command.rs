//! External command execution
//!
//! Commands are awaited to completion and their output captured. A spawn
//! failure (tool not installed) or an exceeded timeout is reported as an
//! unsuccessful [`ToolOutput`] rather than an error, so callers decide whether
//! the failure is fatal.

use crate::utils::{CertKitError, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of an external command
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Turn an unsuccessful run into `ExternalToolFailure`
    pub fn require_success(self, tool: &str, step: &str) -> Result<ToolOutput> {
        if self.success {
            return Ok(self);
        }
        let stderr = match self.stderr.trim() {
            "" => match self.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by a signal".to_string(),
            },
            s => s.to_string(),
        };
        Err(CertKitError::ExternalToolFailure {
            tool: tool.to_string(),
            step: step.to_string(),
            stderr,
        })
    }
}

/// Run `program` with `args`, waiting at most `timeout` if one is given.
///
/// The child is killed when the wait is abandoned, either by the timeout or
/// because the surrounding future was dropped on interrupt.
pub async fn run_tool<I, S>(program: &str, args: I, timeout: Option<Duration>) -> ToolOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!("Running {:?}", cmd.as_std());

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{} timed out after {:?}", program, limit);
                return ToolOutput {
                    success: false,
                    stderr: format!("timed out after {:?}", limit),
                    ..Default::default()
                };
            }
        },
        None => cmd.output().await,
    };

    match result {
        Ok(output) => ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => {
            tracing::debug!("Failed to start {}: {}", program, e);
            ToolOutput {
                success: false,
                stderr: format!("failed to start {}: {}", program, e),
                ..Default::default()
            }
        }
    }
}
