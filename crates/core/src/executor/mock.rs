//! Mock executor for testing.

use crate::executor::base::{ExecError, ExecOutput, ExecRequest, ProcessExecutor};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Executor that returns a canned outcome and records every request.
#[derive(Clone)]
pub struct MockExecutor {
    outcome: Result<ExecOutput, ExecError>,
    calls: Arc<Mutex<Vec<ExecRequest>>>,
}

impl MockExecutor {
    pub fn new(outcome: Result<ExecOutput, ExecError>) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn success(stdout: &str) -> Self {
        Self::new(Ok(ExecOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        }))
    }

    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self::new(Ok(ExecOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
        }))
    }

    pub fn timing_out() -> Self {
        Self::new(Err(ExecError::Timeout {
            command: "mock".to_string(),
            timeout: std::time::Duration::from_secs(120),
        }))
    }

    pub fn unlaunchable(reason: &str) -> Self {
        Self::new(Err(ExecError::Launch {
            command: "mock".to_string(),
            reason: reason.to_string(),
        }))
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<ExecRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProcessExecutor for MockExecutor {
    async fn run(&self, request: &ExecRequest) -> Result<ExecOutput, ExecError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.outcome.clone()
    }
}
