//! Bounded subprocess execution.
//!
//! This module provides the `ProcessExecutor` trait used by the task
//! router to run the external backend, a tokio-backed implementation and
//! a mock for tests.

pub mod base;
pub mod command;
pub mod mock;

pub use base::{ExecError, ExecOutput, ExecRequest, ProcessExecutor};
pub use command::CommandExecutor;
pub use mock::MockExecutor;
