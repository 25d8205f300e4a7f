//! Keyword task router and its HTTP gateway.
//!
//! - [`rules`]: ordered, data-driven routing table
//! - [`prompt`]: backend prompt templates
//! - [`gateway`]: envelope handling and backend execution

pub mod gateway;
pub mod prompt;
pub mod rules;

pub use gateway::TaskRouter;
pub use prompt::build_prompt;
pub use rules::{RouteTarget, RoutingRule, RoutingTable};
