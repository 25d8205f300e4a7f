//! Agent directory models.
//!
//! This module defines the records held by the directory service and the
//! request/response bodies of its HTTP surface (`/a2a/*`).

use chrono::DateTime;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A registered agent as stored and returned by the directory.
///
/// Records are keyed by `agent_id`. Registering the same id again replaces
/// the whole record; capability lists are never merged.
///
/// # Example
///
/// ```json
/// {
///   "agentId": "echo-agent",
///   "name": "Echo Agent",
///   "capabilities": ["echo", "ping"],
///   "endpoint": "http://localhost:9001",
///   "registeredAt": "2026-01-01T00:00:00Z"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    /// Unique identifier of the agent within a directory.
    pub agent_id: String,

    /// Human-readable display name.
    pub name: String,

    /// Opaque capability tags the agent advertises.
    ///
    /// Discovery matches an agent when at least one of these tags is
    /// among the wanted capabilities.
    pub capabilities: Vec<String>,

    /// URL the agent accepts task envelopes on.
    pub endpoint: String,

    /// When the directory accepted the (latest) registration.
    pub registered_at: DateTime<Utc>,
}

impl AgentRecord {
    /// Returns true if this agent advertises the given capability.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// Body of `POST /a2a/register`.
///
/// Every field is optional on the wire so the directory can report all
/// missing fields at once instead of failing on the first one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AgentRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl AgentRegistration {
    /// Build a complete registration.
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        capabilities: Vec<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            name: Some(name.into()),
            capabilities: Some(capabilities),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Names of the required fields that are absent, in wire order.
    ///
    /// An empty capability list counts as missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.agent_id.is_none() {
            missing.push("agentId");
        }
        if self.name.is_none() {
            missing.push("name");
        }
        if !matches!(&self.capabilities, Some(caps) if !caps.is_empty()) {
            missing.push("capabilities");
        }
        if self.endpoint.is_none() {
            missing.push("endpoint");
        }
        missing
    }
}

/// Successful answer to `POST /a2a/register`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Always `"registered"`.
    pub status: String,
    pub agent_id: String,
}

impl RegisterResponse {
    pub fn registered(agent_id: impl Into<String>) -> Self {
        Self {
            status: "registered".to_string(),
            agent_id: agent_id.into(),
        }
    }
}

/// Body of `POST /a2a/discover`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct DiscoverRequest {
    /// Wanted capabilities. An empty list is rejected by the directory.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Answer to `POST /a2a/discover` and `GET /a2a/agents`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct AgentList {
    pub agents: Vec<AgentRecord>,
}

/// `error` text of the directory's 404 for an unknown agent id.
pub const AGENT_NOT_FOUND: &str = "Agent not found";

/// Error body returned by the directory on any non-2xx status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
