//! Task router gateway.
//!
//! Accepts the same envelopes as an agent server, but instead of calling a
//! local handler it classifies the task, builds a prompt and runs the
//! external backend through a [`ProcessExecutor`]. Backend failures never
//! escape as transport errors: every well-formed task gets an HTTP 200 with
//! a [`TaskResult`], successful or not.

use crate::executor::{ExecError, ExecRequest, ProcessExecutor};
use crate::router::prompt::build_prompt;
use crate::router::rules::{RouteTarget, RoutingTable};
use crate::server::agent_server::correlation_id_of;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use mesh_protocol::agent_models::ErrorBody;
use mesh_protocol::config_models::BridgeConfig;
use mesh_protocol::task_models::{
    error_codes, RpcError, TaskParams, TaskResponse, TaskResult, TASK_METHOD,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Output text used when the backend succeeds silently.
const EMPTY_OUTPUT: &str = "Task completed";

/// Keyword router in front of a subprocess backend.
///
/// Cloning is cheap; clones share the table and the executor.
#[derive(Clone)]
pub struct TaskRouter {
    inner: Arc<Inner>,
}

struct Inner {
    table: RoutingTable,
    executor: Arc<dyn ProcessExecutor>,
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl TaskRouter {
    /// Create a router with the default routing table.
    pub fn new(config: &BridgeConfig, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self::with_table(RoutingTable::default(), config, executor)
    }

    pub fn with_table(
        table: RoutingTable,
        config: &BridgeConfig,
        executor: Arc<dyn ProcessExecutor>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                table,
                executor,
                command: config.command.clone(),
                args: config.args.clone(),
                timeout: Duration::from_secs(config.timeout_secs),
            }),
        }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.inner.table
    }

    pub fn classify(&self, action: &str, input: &Value) -> &RouteTarget {
        self.inner.table.classify(action, input)
    }

    /// Backend invocation for `agent_id` with `prompt`.
    ///
    /// `{agent}` and `{prompt}` are substituted inside each argument.
    pub fn backend_request(&self, agent_id: &str, prompt: &str) -> ExecRequest {
        let args = self
            .inner
            .args
            .iter()
            .map(|arg| arg.replace("{agent}", agent_id).replace("{prompt}", prompt))
            .collect();
        ExecRequest::new(self.inner.command.clone(), args, self.inner.timeout)
    }

    /// Route one task and run it to completion.
    ///
    /// The returned result always names the agent that was chosen.
    /// - exit 0 → `completed` with `{"result": <trimmed stdout>, "agent": <id>}`
    /// - non-zero exit → `-32010` carrying the backend's stderr
    /// - timeout → `-32011` "Task timed out"
    /// - spawn failure → `-32012`
    pub async fn execute(&self, params: TaskParams) -> TaskResult {
        let target = self.classify(&params.action, &params.input).clone();
        let prompt = build_prompt(&params.action, &params.input);
        let request = self.backend_request(&target.agent_id, &prompt);

        tracing::info!(
            task_id = %params.task_id,
            sender = %params.sender,
            action = %params.action,
            agent = %target.agent_id,
            "routing task to {}",
            target.name
        );

        let task_id = params.task_id;
        let agent_id = target.agent_id;

        let result = match self.inner.executor.run(&request).await {
            Ok(output) if output.success() => {
                let stdout = output.stdout.trim();
                let text = if stdout.is_empty() { EMPTY_OUTPUT } else { stdout };
                tracing::info!(task_id = %task_id, agent = %agent_id, "backend completed");
                TaskResult::completed(task_id, json!({ "result": text, "agent": agent_id }))
            }
            Ok(output) => {
                let stderr = output.stderr.trim();
                let message = if stderr.is_empty() {
                    match output.exit_code {
                        Some(code) => format!("Backend exited with status {code}"),
                        None => "Backend terminated by signal".to_string(),
                    }
                } else {
                    stderr.to_string()
                };
                tracing::warn!(task_id = %task_id, agent = %agent_id, exit_code = ?output.exit_code, "backend failed");
                TaskResult::failed(task_id, RpcError::new(error_codes::EXECUTION_FAILED, message))
            }
            Err(ExecError::Timeout { timeout, .. }) => {
                tracing::warn!(task_id = %task_id, agent = %agent_id, timeout_secs = timeout.as_secs(), "backend timed out");
                TaskResult::failed(
                    task_id,
                    RpcError::new(error_codes::EXECUTION_TIMEOUT, "Task timed out"),
                )
            }
            Err(e @ ExecError::Launch { .. }) => {
                tracing::error!(task_id = %task_id, agent = %agent_id, error = %e, "backend launch failed");
                TaskResult::failed(
                    task_id,
                    RpcError::new(error_codes::EXECUTION_LAUNCH_FAILED, e.to_string()),
                )
            }
        };

        result.with_agent(agent_id)
    }

    /// Process one raw request body.
    ///
    /// Envelope problems are reported like an agent server would
    /// (`-32700`, `-32601`, `-32602`). A well-formed task always yields a
    /// `result`, even when the backend failed.
    pub async fn dispatch(&self, body: &[u8]) -> TaskResponse {
        let request: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return TaskResponse::failure(None, RpcError::parse_error()),
        };

        let correlation_id = correlation_id_of(&request);

        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        if method != TASK_METHOD {
            tracing::warn!(method, "gateway received unknown method");
            return TaskResponse::failure(correlation_id, RpcError::method_not_found());
        }

        let params: TaskParams = match request.get("params").cloned().map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => return TaskResponse::failure(correlation_id, RpcError::invalid_params(e)),
            None => {
                return TaskResponse::failure(correlation_id, RpcError::invalid_params("missing params"))
            }
        };

        TaskResponse::success(correlation_id, self.execute(params).await)
    }

    /// Build the axum router: `POST /` accepts envelopes, everything else is 404.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_envelope).fallback(unknown_endpoint))
            .fallback(unknown_endpoint)
            .with_state(self.clone())
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(command = %self.inner.command, "bridge listening on http://{addr}");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn handle_envelope(State(router): State<TaskRouter>, body: Bytes) -> Json<TaskResponse> {
    Json(router.dispatch(&body).await)
}

async fn unknown_endpoint() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Unknown endpoint"))).into_response()
}
