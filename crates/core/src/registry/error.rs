//! Error types for registry operations.

use thiserror::Error;

/// Errors returned by the registry store and the discovery matcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The request was incomplete or malformed.
    ///
    /// Mapped to `400 Bad Request` by the directory service.
    #[error("{0}")]
    Validation(String),

    /// No agent is registered under the requested id.
    ///
    /// Mapped to `404 Not Found` by the directory service.
    #[error("Agent not found: {0}")]
    NotFound(String),
}

impl RegistryError {
    /// Validation error naming every missing required field.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::Validation(format!("Missing fields: {fields:?}"))
    }
}

/// Type alias for Result with RegistryError.
pub type RegistryResult<T> = Result<T, RegistryError>;
