//! Tokio subprocess executor.
//!
//! Spawns the command with piped stdout/stderr and waits for it under a
//! `tokio::time::timeout`. The child is spawned with `kill_on_drop`, so a
//! timeout drops the wait future and terminates the process; nothing it
//! printed before that point is kept.

use crate::executor::base::{ExecError, ExecOutput, ExecRequest, ProcessExecutor};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

/// Executor backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Check whether `command` can be found on `PATH`.
    pub fn is_available(command: &str) -> bool {
        which::which(command).is_ok()
    }
}

#[async_trait]
impl ProcessExecutor for CommandExecutor {
    async fn run(&self, request: &ExecRequest) -> Result<ExecOutput, ExecError> {
        let mut cmd = Command::new(&request.command);
        cmd.args(&request.args);
        if let Some(dir) = &request.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| ExecError::Launch {
            command: request.command.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            command = %request.command,
            pid = ?child.id(),
            timeout_secs = request.timeout.as_secs(),
            "spawned backend"
        );

        match timeout(request.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
            }),
            Ok(Err(e)) => Err(ExecError::Launch {
                command: request.command.clone(),
                reason: e.to_string(),
            }),
            Err(_) => {
                tracing::warn!(command = %request.command, "backend timed out, killed");
                Err(ExecError::Timeout {
                    command: request.command.clone(),
                    timeout: request.timeout,
                })
            }
        }
    }
}
