//! Task envelope protocol.
//!
//! Agents invoke each other with JSON-RPC 2.0 shaped envelopes posted
//! directly to the target's endpoint:
//!
//! ```json
//! {
//!   "jsonrpc": "2.0",
//!   "id": "7c1c...",
//!   "method": "a2a/task",
//!   "params": { "taskId": "...", "action": "echo", "sender": "me", "input": {} }
//! }
//! ```
//!
//! The answer carries either a `result` ([`TaskResult`]) or an `error`
//! ([`RpcError`]), echoing the request `id`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use ts_rs::TS;

/// Protocol version marker sent in the `jsonrpc` field.
pub const JSONRPC_VERSION: &str = "2.0";

/// The only method agents currently understand.
pub const TASK_METHOD: &str = "a2a/task";

/// Error codes used in [`RpcError::code`].
pub mod error_codes {
    /// The request body was not valid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// The envelope named a method other than `a2a/task`.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// `params` was missing or did not match the task shape.
    pub const INVALID_PARAMS: i32 = -32602;
    /// The task handler returned an error or panicked.
    pub const HANDLER_FAILED: i32 = -32603;
    /// The agent server has no task handler installed.
    pub const HANDLER_NOT_REGISTERED: i32 = -32001;
    /// The execution backend exited with a non-zero status.
    pub const EXECUTION_FAILED: i32 = -32010;
    /// The execution backend exceeded its wall-clock limit.
    pub const EXECUTION_TIMEOUT: i32 = -32011;
    /// The execution backend could not be started.
    pub const EXECUTION_LAUNCH_FAILED: i32 = -32012;
}

/// Parameters of an `a2a/task` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskParams {
    pub task_id: String,

    /// Free-text action the sender wants performed.
    pub action: String,

    /// Agent id of the caller.
    pub sender: String,

    /// Opaque structured payload, handed to the handler untouched.
    #[serde(default = "empty_object")]
    pub input: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// A task invocation request.
///
/// Serialized with the JSON-RPC keys `jsonrpc` and `id`; deserialization
/// also accepts `protocolVersion` and `correlationId`.
#[derive(Serialize, Debug, Clone, PartialEq, TS)]
pub struct TaskEnvelope {
    #[serde(rename = "jsonrpc")]
    pub protocol_version: String,

    /// Caller-generated id, echoed back in the response.
    #[serde(rename = "id")]
    pub correlation_id: String,

    pub method: String,

    pub params: TaskParams,
}

/// Incoming shape of [`TaskEnvelope`], with the descriptive key aliases.
#[derive(Deserialize)]
struct EnvelopeWire {
    #[serde(rename = "jsonrpc", alias = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "id", alias = "correlationId")]
    correlation_id: String,
    method: String,
    params: TaskParams,
}

impl<'de> Deserialize<'de> for TaskEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = EnvelopeWire::deserialize(deserializer)?;
        Ok(Self {
            protocol_version: wire.protocol_version,
            correlation_id: wire.correlation_id,
            method: wire.method,
            params: wire.params,
        })
    }
}

impl TaskEnvelope {
    /// Build an `a2a/task` envelope.
    pub fn task(correlation_id: impl Into<String>, params: TaskParams) -> Self {
        Self {
            protocol_version: JSONRPC_VERSION.to_string(),
            correlation_id: correlation_id.into(),
            method: TASK_METHOD.to_string(),
            params,
        }
    }
}

/// Outcome status of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Error,
}

/// Structured error carried by a response or a failed [`TaskResult`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error")
    }

    pub fn method_not_found() -> Self {
        Self::new(error_codes::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn invalid_params(detail: impl fmt::Display) -> Self {
        Self::new(error_codes::INVALID_PARAMS, format!("Invalid params: {detail}"))
    }

    pub fn handler_not_registered() -> Self {
        Self::new(error_codes::HANDLER_NOT_REGISTERED, "No handler registered")
    }

    pub fn handler_failed(detail: impl fmt::Display) -> Self {
        Self::new(error_codes::HANDLER_FAILED, format!("Handler failed: {detail}"))
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Result of a single task, produced by an agent server or the gateway.
///
/// Exactly one of `output` and `error` is set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_id: String,

    pub status: TaskStatus,

    /// Handler output, returned verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,

    /// Agent the gateway routed the task to. Unset for direct peers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl TaskResult {
    pub fn completed(task_id: impl Into<String>, output: Value) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            output: Some(output),
            error: None,
            agent: None,
        }
    }

    pub fn failed(task_id: impl Into<String>, error: RpcError) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Error,
            output: None,
            error: Some(error),
            agent: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Response to a [`TaskEnvelope`].
///
/// `id` is `null` when the request could not be parsed far enough to
/// recover it.
#[derive(Serialize, Debug, Clone, PartialEq, TS)]
pub struct TaskResponse {
    #[serde(rename = "jsonrpc")]
    pub protocol_version: String,

    #[serde(rename = "id")]
    pub correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Incoming shape of [`TaskResponse`], with the descriptive key aliases.
#[derive(Deserialize)]
struct ResponseWire {
    #[serde(rename = "jsonrpc", alias = "protocolVersion")]
    protocol_version: String,
    #[serde(default, rename = "id", alias = "correlationId")]
    correlation_id: Option<String>,
    #[serde(default)]
    result: Option<TaskResult>,
    #[serde(default)]
    error: Option<RpcError>,
}

impl<'de> Deserialize<'de> for TaskResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ResponseWire::deserialize(deserializer)?;
        Ok(Self {
            protocol_version: wire.protocol_version,
            correlation_id: wire.correlation_id,
            result: wire.result,
            error: wire.error,
        })
    }
}

impl TaskResponse {
    pub fn success(correlation_id: Option<String>, result: TaskResult) -> Self {
        Self {
            protocol_version: JSONRPC_VERSION.to_string(),
            correlation_id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(correlation_id: Option<String>, error: RpcError) -> Self {
        Self {
            protocol_version: JSONRPC_VERSION.to_string(),
            correlation_id,
            result: None,
            error: Some(error),
        }
    }

    /// Split the response into its result or its error.
    ///
    /// A response carrying neither is reported as a handler failure.
    pub fn into_result(self) -> Result<TaskResult, RpcError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::handler_failed("empty response")),
        }
    }
}
