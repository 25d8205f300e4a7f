//! In-memory registry of agent records.
//!
//! The `RegistryStore` is the single owner of agent records for a directory
//! process. It is constructed once and shared behind an `Arc`; all access
//! goes through an internal reader/writer lock so concurrent requests can
//! register and discover safely.

use crate::registry::discovery;
use crate::registry::error::{RegistryError, RegistryResult};
use chrono::Utc;
use indexmap::IndexMap;
use mesh_protocol::agent_models::{AgentRecord, AgentRegistration};
use tokio::sync::RwLock;

/// Volatile, process-lifetime store of agent records.
///
/// Records are kept in the order their id was first registered. Re-registering
/// an existing id replaces the record in place without changing that order.
#[derive(Debug, Default)]
pub struct RegistryStore {
    agents: RwLock<IndexMap<String, AgentRecord>>,
}

impl RegistryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record for `registration.agent_id`.
    ///
    /// # Arguments
    ///
    /// * `registration` - The registration body as received from the agent
    ///
    /// # Returns
    ///
    /// The stored record, with `registered_at` set to the current time.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` naming every missing required
    /// field (`agentId`, `name`, `capabilities`, `endpoint`).
    pub async fn register(&self, registration: AgentRegistration) -> RegistryResult<AgentRecord> {
        let missing = registration.missing_fields();
        if !missing.is_empty() {
            return Err(RegistryError::missing_fields(&missing));
        }

        let (Some(agent_id), Some(name), Some(capabilities), Some(endpoint)) = (
            registration.agent_id,
            registration.name,
            registration.capabilities,
            registration.endpoint,
        ) else {
            return Err(RegistryError::Validation(
                "Incomplete registration".to_string(),
            ));
        };

        let record = AgentRecord {
            agent_id,
            name,
            capabilities,
            endpoint,
            registered_at: Utc::now(),
        };

        let mut agents = self.agents.write().await;
        agents.insert(record.agent_id.clone(), record.clone());
        tracing::info!(
            agent_id = %record.agent_id,
            name = %record.name,
            capabilities = ?record.capabilities,
            "registered agent"
        );

        Ok(record)
    }

    /// Look up a single agent.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no agent has this id.
    pub async fn get(&self, agent_id: &str) -> RegistryResult<AgentRecord> {
        self.agents
            .read()
            .await
            .get(agent_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(agent_id.to_string()))
    }

    /// All records, in order of first registration.
    pub async fn list(&self) -> Vec<AgentRecord> {
        self.agents.read().await.values().cloned().collect()
    }

    /// Every record sharing at least one capability with `wanted`.
    ///
    /// See [`discovery::discover`] for the matching rules.
    pub async fn discover(&self, wanted: &[String]) -> RegistryResult<Vec<AgentRecord>> {
        let agents = self.agents.read().await;
        let found = discovery::discover(agents.values(), wanted)?;
        tracing::debug!(?wanted, found = found.len(), "discovery");
        Ok(found)
    }

    /// Number of registered agents.
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    /// Check if no agent has registered yet.
    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}
