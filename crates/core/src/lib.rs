//! # mesh-core
//!
//! Directory, discovery and task delivery for agent meshes.
//!
//! This crate provides:
//! - An in-memory agent registry and the HTTP directory in front of it
//! - A client that registers, discovers and sends tasks peer to peer
//! - An agent-side task server with a single replaceable handler
//! - A keyword task router that runs tasks through an external backend
//!
//! ## Modules
//!
//! - [`registry`]: Registry store and capability matching
//! - [`directory`]: HTTP directory service
//! - [`client`]: Agent client
//! - [`server`]: Agent task server and handler trait
//! - [`router`]: Routing table, prompts and gateway
//! - [`executor`]: Bounded subprocess execution
//! - [`config`]: Configuration loading from `.mesh/`

pub mod client;
pub mod config;
pub mod directory;
pub mod executor;
pub mod registry;
pub mod router;
pub mod server;
