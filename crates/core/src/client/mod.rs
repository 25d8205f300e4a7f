//! Agent client for directory access and peer-to-peer task delivery.

pub mod agent_client;
pub mod error;

pub use agent_client::AgentClient;
pub use error::{ClientError, ClientResult};
