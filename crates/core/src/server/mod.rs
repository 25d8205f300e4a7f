//! Agent-side task endpoint.
//!
//! This module provides the `AgentServer` that accepts task envelopes and
//! the `TaskHandler` trait it dispatches to.

pub mod agent_server;
pub mod handler;

pub use agent_server::AgentServer;
pub use handler::{EchoHandler, HandlerError, TaskHandler};
