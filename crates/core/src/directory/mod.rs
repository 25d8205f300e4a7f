//! Directory service HTTP surface.
//!
//! Maps the registry operations onto four routes:
//!
//! | route                       | operation                    |
//! |-----------------------------|------------------------------|
//! | `POST /a2a/register`        | [`RegistryStore::register`]  |
//! | `POST /a2a/discover`        | [`RegistryStore::discover`]  |
//! | `GET  /a2a/agents`          | [`RegistryStore::list`]      |
//! | `GET  /a2a/agents/:agentId` | [`RegistryStore::get`]       |
//!
//! Bodies are parsed here rather than with the `Json` extractor so that
//! malformed input always yields `400 {"error": ...}`. Any other route or
//! method yields `404 {"error": "Unknown endpoint"}`.

use crate::registry::{RegistryError, RegistryStore};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mesh_protocol::agent_models::{
    AgentList, AgentRegistration, DiscoverRequest, ErrorBody, RegisterResponse, AGENT_NOT_FOUND,
};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match self {
            RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let message = match self {
            RegistryError::NotFound(_) => AGENT_NOT_FOUND.to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// HTTP front of a [`RegistryStore`].
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<RegistryStore>,
}

impl DirectoryService {
    /// Wrap an existing store.
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// The store this service reads and writes.
    pub fn store(&self) -> &Arc<RegistryStore> {
        &self.store
    }

    /// Build the axum router for the `/a2a/*` surface.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/a2a/register", post(register).fallback(unknown_endpoint))
            .route("/a2a/discover", post(discover).fallback(unknown_endpoint))
            .route("/a2a/agents", get(list_agents).fallback(unknown_endpoint))
            .route("/a2a/agents/:agent_id", get(get_agent).fallback(unknown_endpoint))
            .fallback(unknown_endpoint)
            .with_state(Arc::clone(&self.store))
    }

    /// Serve on an already bound listener until the process exits.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("directory service listening on http://{addr}");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Parse a JSON body, treating an empty body as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, RegistryError> {
    let bytes: &[u8] = if body.is_empty() { b"{}" } else { body };

    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|_| RegistryError::Validation("Invalid JSON".to_string()))?;

    serde_json::from_value(value)
        .map_err(|e| RegistryError::Validation(format!("Invalid request body: {e}")))
}

async fn register(State(store): State<Arc<RegistryStore>>, body: Bytes) -> Response {
    let result = match parse_body::<AgentRegistration>(&body) {
        Ok(registration) => store.register(registration).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(record) => {
            tracing::info!(op = "register", agent_id = %record.agent_id, "ok");
            Json(RegisterResponse::registered(record.agent_id)).into_response()
        }
        Err(e) => {
            tracing::warn!(op = "register", error = %e, "rejected");
            e.into_response()
        }
    }
}

async fn discover(State(store): State<Arc<RegistryStore>>, body: Bytes) -> Response {
    let result = match parse_body::<DiscoverRequest>(&body) {
        Ok(request) => store.discover(&request.capabilities).await.map(|agents| {
            tracing::info!(
                op = "discover",
                wanted = ?request.capabilities,
                found = agents.len(),
                "ok"
            );
            agents
        }),
        Err(e) => Err(e),
    };

    match result {
        Ok(agents) => Json(AgentList { agents }).into_response(),
        Err(e) => {
            tracing::warn!(op = "discover", error = %e, "rejected");
            e.into_response()
        }
    }
}

async fn list_agents(State(store): State<Arc<RegistryStore>>) -> Json<AgentList> {
    let agents = store.list().await;
    tracing::info!(op = "list", count = agents.len(), "ok");
    Json(AgentList { agents })
}

async fn get_agent(
    State(store): State<Arc<RegistryStore>>,
    Path(agent_id): Path<String>,
) -> Response {
    match store.get(&agent_id).await {
        Ok(record) => {
            tracing::info!(op = "get", agent_id = %agent_id, "ok");
            Json(record).into_response()
        }
        Err(e) => {
            tracing::info!(op = "get", agent_id = %agent_id, "not found");
            e.into_response()
        }
    }
}

async fn unknown_endpoint() -> Response {
    tracing::debug!(op = "unknown", "not found");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Unknown endpoint")),
    )
        .into_response()
}
