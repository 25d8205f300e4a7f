//! Agent registry and capability discovery.
//!
//! This module provides the `RegistryStore` that owns agent records and
//! the discovery matcher that queries it by capability.

pub mod discovery;
pub mod error;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use store::RegistryStore;
