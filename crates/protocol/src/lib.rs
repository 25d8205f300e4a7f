//! # mesh-protocol
//!
//! Wire and configuration types shared by every agent-mesh component.
//!
//! This crate defines:
//! - Directory records and the bodies of the `/a2a/*` HTTP surface
//! - The task envelope agents use to invoke each other
//! - The `.mesh/config.toml` configuration file
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent records, registration and discovery bodies
//! - [`task_models`]: Task envelope, response, result and error codes
//! - [`config_models`]: Global configuration
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, ts-rs and chrono
//! - TypeScript generation: all types derive `TS` for non-Rust agents
//! - Independent compilation: no dependencies on other agent-mesh crates

pub mod agent_models;
pub mod config_models;
pub mod task_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use task_models::*;
