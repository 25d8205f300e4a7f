//! HTTP server that accepts task envelopes for one agent.
//!
//! The server holds a single handler slot. Installing a handler replaces
//! whatever was there before (last registration wins). The slot sits behind
//! a lock so it can be swapped while requests are in flight; a request
//! keeps the handler it started with.

use crate::server::handler::TaskHandler;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use mesh_protocol::agent_models::ErrorBody;
use mesh_protocol::task_models::{RpcError, TaskParams, TaskResponse, TaskResult, TASK_METHOD};
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::net::TcpListener;

/// Task endpoint of a single agent.
///
/// Cloning is cheap; clones share the handler slot.
#[derive(Clone)]
pub struct AgentServer {
    inner: Arc<Inner>,
}

struct Inner {
    agent_id: String,
    name: String,
    capabilities: Vec<String>,
    port: u16,
    handler: RwLock<Option<Arc<dyn TaskHandler>>>,
}

impl AgentServer {
    /// Create a server with an empty handler slot.
    ///
    /// # Arguments
    ///
    /// * `agent_id` - Id this agent registers under
    /// * `name` - Display name
    /// * `capabilities` - Capability tags to advertise
    /// * `port` - Port used by [`AgentServer::run`] and [`AgentServer::endpoint`]
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        capabilities: Vec<String>,
        port: u16,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                agent_id: agent_id.into(),
                name: name.into(),
                capabilities,
                port,
                handler: RwLock::new(None),
            }),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.inner.agent_id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn capabilities(&self) -> &[String] {
        &self.inner.capabilities
    }

    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Endpoint URL other agents should post envelopes to.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.inner.port)
    }

    /// Install the task handler, replacing any previous one.
    pub fn handle_task<H: TaskHandler>(&self, handler: H) {
        let mut slot = self
            .inner
            .handler
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            tracing::debug!(agent_id = %self.inner.agent_id, "replacing task handler");
        }
        *slot = Some(Arc::new(handler));
    }

    /// Check if a handler is installed.
    pub fn has_handler(&self) -> bool {
        self.current_handler().is_some()
    }

    fn current_handler(&self) -> Option<Arc<dyn TaskHandler>> {
        self.inner
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Process one raw request body and produce the response envelope.
    ///
    /// # Behavior
    ///
    /// 1. Body is not JSON → `-32700`
    /// 2. `method` is not `a2a/task` → `-32601`
    /// 3. No handler installed → `-32001`
    /// 4. `params` missing or malformed → `-32602`
    /// 5. Otherwise the handler runs on the blocking pool. Its value is
    ///    returned as `output`; an error or panic becomes `-32603`.
    pub async fn dispatch(&self, body: &[u8]) -> TaskResponse {
        let request: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return TaskResponse::failure(None, RpcError::parse_error()),
        };

        let correlation_id = correlation_id_of(&request);

        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        if method != TASK_METHOD {
            tracing::warn!(agent_id = %self.inner.agent_id, method, "method not found");
            return TaskResponse::failure(correlation_id, RpcError::method_not_found());
        }

        let Some(handler) = self.current_handler() else {
            tracing::warn!(agent_id = %self.inner.agent_id, "task received with no handler");
            return TaskResponse::failure(correlation_id, RpcError::handler_not_registered());
        };

        let params: TaskParams = match request
            .get("params")
            .cloned()
            .map(serde_json::from_value)
        {
            Some(Ok(params)) => params,
            Some(Err(e)) => return TaskResponse::failure(correlation_id, RpcError::invalid_params(e)),
            None => {
                return TaskResponse::failure(correlation_id, RpcError::invalid_params("missing params"))
            }
        };

        tracing::info!(
            agent_id = %self.inner.agent_id,
            task_id = %params.task_id,
            action = %params.action,
            sender = %params.sender,
            "task received"
        );

        let TaskParams {
            task_id,
            action,
            sender,
            input,
        } = params;

        let outcome = tokio::task::spawn_blocking(move || handler.handle(&action, &input, &sender)).await;

        match outcome {
            Ok(Ok(output)) => TaskResponse::success(correlation_id, TaskResult::completed(task_id, output)),
            Ok(Err(e)) => {
                tracing::warn!(task_id = %task_id, error = %e, "handler failed");
                TaskResponse::failure(correlation_id, RpcError::handler_failed(e))
            }
            Err(join) => {
                tracing::error!(task_id = %task_id, error = %join, "handler panicked");
                TaskResponse::failure(correlation_id, RpcError::handler_failed("handler panicked"))
            }
        }
    }

    /// Build the axum router: `POST /` accepts envelopes, everything else is 404.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_envelope).fallback(unknown_endpoint))
            .fallback(unknown_endpoint)
            .with_state(self.clone())
    }

    /// Bind `0.0.0.0:<port>` and serve until the process exits.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.inner.port)).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until the process exits.
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(agent_id = %self.inner.agent_id, "agent listening on http://{addr}");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Recover the request id, accepting the descriptive alias too.
pub(crate) fn correlation_id_of(request: &Value) -> Option<String> {
    match request.get("id").or_else(|| request.get("correlationId")) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => Some(other.to_string()),
    }
}

async fn handle_envelope(State(server): State<AgentServer>, body: Bytes) -> Json<TaskResponse> {
    Json(server.dispatch(&body).await)
}

async fn unknown_endpoint() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Unknown endpoint")),
    )
        .into_response()
}
