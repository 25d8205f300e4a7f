//! Process execution trait and supporting types.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A single bounded subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Program to run, resolved through `PATH`.
    pub command: String,

    /// Arguments passed verbatim, without a shell.
    pub args: Vec<String>,

    /// Hard wall-clock limit. The child is killed when it elapses.
    pub timeout: Duration,

    /// Working directory. Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
}

impl ExecRequest {
    /// Create a request with no working directory override.
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
            working_dir: None,
        }
    }

    /// Set the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Captured output of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,

    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ExecOutput {
    /// True if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("Failed to spawn command '{command}': {reason}")]
    Launch { command: String, reason: String },
    #[error("Command '{command}' timed out after {}s", timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },
}

/// Runs external commands with a bounded wall-clock time.
///
/// A non-zero exit is not an error at this level: it comes back as an
/// [`ExecOutput`] so the caller can report the captured stderr.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    async fn run(&self, request: &ExecRequest) -> Result<ExecOutput, ExecError>;
}
