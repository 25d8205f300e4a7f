//! Task handler trait.

use serde_json::Value;
use thiserror::Error;

/// Failure reported by a task handler.
///
/// The agent server turns it into a `-32603` error response; it never
/// surfaces as a transport failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Handles incoming tasks for an agent server.
///
/// Implemented for any `Fn(action, input, sender) -> Result<Value, HandlerError>`
/// closure, so most agents never implement it by hand:
///
/// ```
/// use mesh_core::server::{AgentServer, HandlerError};
/// use serde_json::{json, Value};
///
/// let server = AgentServer::new("echo-agent", "Echo Agent", vec!["echo".into()], 9001);
/// server.handle_task(|action: &str, input: &Value, sender: &str| -> Result<Value, HandlerError> {
///     Ok(json!({ "action": action, "input": input, "from": sender }))
/// });
/// ```
pub trait TaskHandler: Send + Sync + 'static {
    fn handle(&self, action: &str, input: &Value, sender: &str) -> Result<Value, HandlerError>;
}

impl<F> TaskHandler for F
where
    F: Fn(&str, &Value, &str) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    fn handle(&self, action: &str, input: &Value, sender: &str) -> Result<Value, HandlerError> {
        self(action, input, sender)
    }
}

/// Handler that reflects the task back to the sender.
///
/// Used by `mesh serve` when no other behaviour is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl TaskHandler for EchoHandler {
    fn handle(&self, action: &str, input: &Value, sender: &str) -> Result<Value, HandlerError> {
        Ok(serde_json::json!({
            "received_action": action,
            "received_input": input,
            "from": sender,
        }))
    }
}
