//! Directory and peer client for agents.
//!
//! An `AgentClient` carries one agent's identity. It talks to the directory
//! for registration, discovery and endpoint resolution, and then posts task
//! envelopes straight to the target agent. The directory never relays tasks.

use crate::client::error::{ClientError, ClientResult};
use mesh_protocol::agent_models::{
    AgentList, AgentRecord, AgentRegistration, DiscoverRequest, ErrorBody, RegisterResponse,
    AGENT_NOT_FOUND,
};
use mesh_protocol::task_models::{TaskEnvelope, TaskParams, TaskResponse};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Client side of the agent protocol.
#[derive(Debug, Clone)]
pub struct AgentClient {
    agent_id: String,
    name: String,
    capabilities: Vec<String>,
    directory_url: String,
    endpoint: Option<String>,
    http: Client,
}

impl AgentClient {
    /// Create a client for the agent `agent_id`.
    ///
    /// # Arguments
    ///
    /// * `agent_id` - Id used as `sender` on outgoing tasks and as the registration key
    /// * `name` - Display name sent on registration
    /// * `capabilities` - Tags sent on registration
    /// * `directory_url` - Base URL of the directory; a trailing `/` is ignored
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        capabilities: Vec<String>,
        directory_url: impl Into<String>,
    ) -> Self {
        let directory_url: String = directory_url.into();
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            capabilities,
            directory_url: directory_url.trim_end_matches('/').to_string(),
            endpoint: None,
            http: Client::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn directory_url(&self) -> &str {
        &self.directory_url
    }

    /// Endpoint passed to the last successful [`register`](Self::register).
    ///
    /// Informational only; outgoing tasks always resolve the target's
    /// endpoint through the directory.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Register this agent with the directory under `endpoint`.
    ///
    /// # Errors
    ///
    /// - `ClientError::Registration` with the directory's error payload on any non-2xx answer
    /// - `ClientError::Transport` if the directory cannot be reached
    pub async fn register(&mut self, endpoint: &str) -> ClientResult<RegisterResponse> {
        let body = AgentRegistration::new(
            self.agent_id.clone(),
            self.name.clone(),
            self.capabilities.clone(),
            endpoint,
        );

        let response = self
            .http
            .post(format!("{}/a2a/register", self.directory_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let payload = error_payload(response).await;
            tracing::warn!(agent_id = %self.agent_id, %payload, "registration rejected");
            return Err(ClientError::Registration(payload));
        }

        let registered: RegisterResponse = response.json().await?;
        self.endpoint = Some(endpoint.to_string());
        tracing::info!(agent_id = %self.agent_id, endpoint, "registered with directory");
        Ok(registered)
    }

    /// First agent advertising any of `wanted`, or `None`.
    ///
    /// The pick is simply the first record in directory order. It is a
    /// selection policy, not a best-match guarantee; use
    /// [`discover_all`](Self::discover_all) to score candidates yourself.
    pub async fn discover(&self, wanted: &[String]) -> ClientResult<Option<AgentRecord>> {
        Ok(self.discover_all(wanted).await?.into_iter().next())
    }

    /// Every agent advertising any of `wanted`, in directory order.
    pub async fn discover_all(&self, wanted: &[String]) -> ClientResult<Vec<AgentRecord>> {
        let response = self
            .http
            .post(format!("{}/a2a/discover", self.directory_url))
            .json(&DiscoverRequest {
                capabilities: wanted.to_vec(),
            })
            .send()
            .await?;

        let list: AgentList = directory_json(response).await?;
        Ok(list.agents)
    }

    /// Every registered agent, in registration order.
    pub async fn list_agents(&self) -> ClientResult<Vec<AgentRecord>> {
        let response = self
            .http
            .get(format!("{}/a2a/agents", self.directory_url))
            .send()
            .await?;

        let list: AgentList = directory_json(response).await?;
        Ok(list.agents)
    }

    /// Resolve a single agent through the directory.
    ///
    /// # Errors
    ///
    /// - `ClientError::AgentNotFound` if the directory reports the id as unknown
    /// - `ClientError::Directory` for any other non-2xx answer, including a
    ///   404 from something that is not a directory
    pub async fn get_agent(&self, agent_id: &str) -> ClientResult<AgentRecord> {
        let response = self.http.get(self.agent_url(agent_id)?).send().await?;

        if response.status() != StatusCode::NOT_FOUND {
            return directory_json(response).await;
        }

        let payload = error_payload(response).await;
        match payload.get("error").and_then(Value::as_str) {
            Some(AGENT_NOT_FOUND) => Err(ClientError::AgentNotFound(agent_id.to_string())),
            Some(message) => Err(ClientError::Directory {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: message.to_string(),
            }),
            None => Err(ClientError::Directory {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: payload.to_string(),
            }),
        }
    }

    /// `<directory>/a2a/agents/<agent_id>` with the id as one encoded segment.
    ///
    /// Ids are opaque, so `/`, `?` and `#` must not change the route.
    fn agent_url(&self, agent_id: &str) -> ClientResult<Url> {
        let invalid = || ClientError::Transport(format!("invalid directory url: {}", self.directory_url));

        let mut url = Url::parse(&self.directory_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["a2a", "agents", agent_id]);
        Ok(url)
    }

    /// Send a task to `target_agent_id` and wait for its answer.
    ///
    /// There is no implicit timeout; see
    /// [`send_task_with_deadline`](Self::send_task_with_deadline).
    pub async fn send_task(
        &self,
        target_agent_id: &str,
        action: &str,
        input: Value,
    ) -> ClientResult<TaskResponse> {
        self.send_task_with_deadline(target_agent_id, action, input, None)
            .await
    }

    /// Send a task, optionally bounding the whole call by `deadline`.
    ///
    /// # Behavior
    ///
    /// 1. Generate a fresh correlation id and task id
    /// 2. Resolve the target's endpoint through the directory
    /// 3. Post the envelope directly to that endpoint
    ///
    /// The returned [`TaskResponse`] may itself carry a protocol error (for
    /// example `-32001` when the target has no handler); use
    /// [`TaskResponse::into_result`] to split it.
    ///
    /// # Errors
    ///
    /// - `ClientError::AgentNotFound` if the directory does not know the target
    /// - `ClientError::Directory` if the directory lookup fails otherwise
    /// - `ClientError::Transport` on connection failure, non-2xx or undecodable reply
    /// - `ClientError::Deadline` if `deadline` elapses first
    pub async fn send_task_with_deadline(
        &self,
        target_agent_id: &str,
        action: &str,
        input: Value,
        deadline: Option<Duration>,
    ) -> ClientResult<TaskResponse> {
        let call = self.deliver(target_agent_id, action, input);
        match deadline {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ClientError::Deadline(limit))?,
            None => call.await,
        }
    }

    async fn deliver(
        &self,
        target_agent_id: &str,
        action: &str,
        input: Value,
    ) -> ClientResult<TaskResponse> {
        let target = self.get_agent(target_agent_id).await?;

        let envelope = TaskEnvelope::task(
            Uuid::new_v4().to_string(),
            TaskParams {
                task_id: Uuid::new_v4().to_string(),
                action: action.to_string(),
                sender: self.agent_id.clone(),
                input,
            },
        );

        tracing::info!(
            sender = %self.agent_id,
            target = %target.agent_id,
            endpoint = %target.endpoint,
            correlation_id = %envelope.correlation_id,
            action,
            "sending task"
        );

        let response = self
            .http
            .post(&target.endpoint)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "{} answered HTTP {}",
                target.endpoint,
                status.as_u16()
            )));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Transport(format!("malformed task response: {e}")))
    }
}

/// Decode a directory answer, turning non-2xx into `ClientError::Directory`.
async fn directory_json<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let payload = error_payload(response).await;
        let message = serde_json::from_value::<ErrorBody>(payload.clone())
            .map(|body| body.error)
            .unwrap_or_else(|_| payload.to_string());
        return Err(ClientError::Directory {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::Transport(format!("malformed directory response: {e}")))
}

/// Best-effort JSON error body; falls back to the raw text.
async fn error_payload(response: Response) -> Value {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(text) => serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "error": format!("HTTP {status}"), "message": text })),
        Err(_) => serde_json::json!({ "error": format!("HTTP {status}") }),
    }
}
