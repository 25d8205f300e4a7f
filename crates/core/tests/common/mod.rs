//! Shared helpers for the HTTP integration tests.
//!
//! Every service is bound to `127.0.0.1:0` so tests can run in parallel.

pub mod fixtures;
pub mod servers;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use servers::*;
