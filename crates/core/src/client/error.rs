//! Error types for the agent client.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised to the caller of [`AgentClient`](crate::client::AgentClient).
///
/// None of these are retried.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The directory rejected a registration. Carries its error payload.
    #[error("Registration failed: {0}")]
    Registration(Value),

    /// The target id is unknown to the directory.
    ///
    /// Raised before any request is made to the target itself.
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// The directory answered a query with a non-success status.
    #[error("Directory returned HTTP {status}: {message}")]
    Directory { status: u16, message: String },

    /// Connection failure, non-success status from a peer, or an
    /// undecodable response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller-supplied deadline elapsed before the call finished.
    #[error("Deadline of {}ms exceeded", .0.as_millis())]
    Deadline(Duration),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Type alias for Result with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
